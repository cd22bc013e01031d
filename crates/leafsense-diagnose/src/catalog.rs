//! Static class catalog for the pre-trained leaf-disease model.
//!
//! Pure configuration data: the model emits class ids 0..29 and this table
//! says what each one means.  Loaded into the binary at compile time, never
//! mutated, safe to share across concurrent requests.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseStatus {
    Healthy,
    Diseased,
}

/// What one model class id means agronomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseInfo {
    pub crop: &'static str,
    pub disease: &'static str,
    pub status: DiseaseStatus,
}

/// Raw training labels, indexed by class id.
pub const CLASS_NAMES: [&str; 29] = [
    "Apple_leaf",
    "Apple_rust_leaf",
    "Apple_Scab_Leaf",
    "Bell_pepper_leaf",
    "Bell_pepper_leaf_spot",
    "Blueberry_leaf",
    "Cherry_leaf",
    "Corn_Gray_leaf_spot",
    "Corn_leaf_blight",
    "Corn_rust_leaf",
    "grape_leaf",
    "grape_leaf_black_rot",
    "Peach_leaf",
    "Potato_leaf",
    "Potato_leaf_early_blight",
    "Potato_leaf_late_blight",
    "Raspberry_leaf",
    "Soyabean_leaf",
    "Squash_Powdery_mildew_leaf",
    "Strawberry_leaf",
    "Tomato_Early_blight_leaf",
    "Tomato_leaf",
    "Tomato_leaf_bacterial_spot",
    "Tomato_leaf_late_blight",
    "Tomato_leaf_mosaic_virus",
    "Tomato_leaf_yellow_virus",
    "Tomato_mold_leaf",
    "Tomato_Septoria_leaf_spot",
    "Tomato_two_spotted_spider_mites_leaf",
];

use DiseaseStatus::{Diseased, Healthy};

const fn info(crop: &'static str, disease: &'static str, status: DiseaseStatus) -> DiseaseInfo {
    DiseaseInfo {
        crop,
        disease,
        status,
    }
}

const CATALOG: [DiseaseInfo; 29] = [
    info("Apple", "Healthy", Healthy),
    info("Apple", "Rust", Diseased),
    info("Apple", "Scab", Diseased),
    info("Bell Pepper", "Healthy", Healthy),
    info("Bell Pepper", "Leaf Spot", Diseased),
    info("Blueberry", "Healthy", Healthy),
    info("Cherry", "Healthy", Healthy),
    info("Corn", "Gray Leaf Spot", Diseased),
    info("Corn", "Leaf Blight", Diseased),
    info("Corn", "Rust", Diseased),
    info("Grape", "Healthy", Healthy),
    info("Grape", "Black Rot", Diseased),
    info("Peach", "Healthy", Healthy),
    info("Potato", "Healthy", Healthy),
    info("Potato", "Early Blight", Diseased),
    info("Potato", "Late Blight", Diseased),
    info("Raspberry", "Healthy", Healthy),
    info("Soybean", "Healthy", Healthy),
    info("Squash", "Powdery Mildew", Diseased),
    info("Strawberry", "Healthy", Healthy),
    info("Tomato", "Early Blight", Diseased),
    info("Tomato", "Healthy", Healthy),
    info("Tomato", "Bacterial Spot", Diseased),
    info("Tomato", "Late Blight", Diseased),
    info("Tomato", "Mosaic Virus", Diseased),
    info("Tomato", "Yellow Leaf Curl Virus", Diseased),
    info("Tomato", "Leaf Mold", Diseased),
    info("Tomato", "Septoria Leaf Spot", Diseased),
    info("Tomato", "Two Spotted Spider Mites", Diseased),
];

pub const NUM_CLASSES: usize = CATALOG.len();

/// Look up the crop/disease entry for a model class id.
pub fn lookup(class_id: usize) -> Option<&'static DiseaseInfo> {
    CATALOG.get(class_id)
}

/// The raw training label for a class id, mostly useful in logs.
pub fn class_name(class_id: usize) -> Option<&'static str> {
    CLASS_NAMES.get(class_id).copied()
}
