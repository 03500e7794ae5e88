//! Image-based data extraction helper.
//!
//! Flow: select an image (read and sniffed locally, nothing uploaded), upload it on
//! request, then map the returned record onto a registration form. The mapping is a
//! best-effort adapter: unknown or malformed values become empty fields.

use super::registration::PatientForm;
use crate::constants::EXTRACT_IMAGE_FIELD;
use crate::dates::format_date_for_input;
use crate::notice::Notice;
use crate::service::{ExtractionApi, ImageUpload};
use crate::{RecordsError, RecordsResult};
use serde_json::Value;
use std::path::Path;

/// What the user sees before uploading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct ExtractionHelper {
    image: Option<ImageUpload>,
    extracted: Option<Value>,
}

impl ExtractionHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the file at `path` and keep it as the pending upload.
    ///
    /// # Errors
    ///
    /// - `RecordsError::FileRead` if the file cannot be read.
    /// - `RecordsError::NotAnImage` if its content is not a recognised image type.
    pub async fn select_file(&mut self, path: &Path) -> RecordsResult<ImagePreview> {
        let bytes = tokio::fs::read(path).await.map_err(RecordsError::FileRead)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let upload = image_upload(file_name, bytes)?;

        let preview = preview_of(&upload);
        self.image = Some(upload);
        self.extracted = None;
        Ok(preview)
    }

    pub fn preview(&self) -> Option<ImagePreview> {
        self.image.as_ref().map(preview_of)
    }

    /// Upload the selected image as multipart field `image`.
    pub async fn upload(&mut self, api: &dyn ExtractionApi) -> RecordsResult<&Value> {
        let image = self.image.as_ref().ok_or(RecordsError::NoImageSelected)?;
        tracing::debug!(
            "uploading {} ({} bytes) as field {:?}",
            image.file_name,
            image.bytes.len(),
            EXTRACT_IMAGE_FIELD
        );
        let value = api.extract(image).await.map_err(|e| {
            tracing::error!("error uploading image {}: {}", image.file_name, e);
            RecordsError::Api(e)
        })?;
        Ok(self.extracted.insert(value))
    }

    /// Map the extraction result onto a registration form, if there is one.
    pub fn use_data(&self) -> Option<PatientForm> {
        self.extracted.as_ref().map(map_extracted)
    }
}

/// Notice shown when the upload fails.
pub fn extraction_failed_notice() -> Notice {
    Notice::error("Error extracting data")
        .with_description("Failed to extract data from the image. Please try again.")
}

fn image_upload(file_name: String, bytes: Vec<u8>) -> RecordsResult<ImageUpload> {
    match infer::get(&bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(ImageUpload {
            file_name,
            mime_type: kind.mime_type().to_string(),
            bytes,
        }),
        _ => Err(RecordsError::NotAnImage(file_name)),
    }
}

fn preview_of(image: &ImageUpload) -> ImagePreview {
    ImagePreview {
        file_name: image.file_name.clone(),
        mime_type: image.mime_type.clone(),
        size: image.bytes.len(),
    }
}

/// Map an extraction record onto the registration form.
///
/// Ailments are never extracted and the disability status is left blank.
pub fn map_extracted(value: &Value) -> PatientForm {
    let text = |key: &str| match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    PatientForm {
        reg_no: text("registration_number"),
        name: text("name"),
        dob: format_date_for_input(&text("date_of_birth")),
        age: text("age"),
        sex: map_gender(&text("sex")).to_string(),
        caste: text("caste"),
        mobile_no: text("mobile_number"),
        aadhar_no: text("aadhar_number"),
        address: text("address"),
        date_of_admission: format_date_for_input(&text("date_of_admission")),
        mothers_name: text("mother's_name"),
        relatives: text("relatives"),
        blood_group: text("blood_group"),
        mb_or_pb_status: text("leprosy_type"),
        deformity_status: text("deformity_status"),
        duration_of_disease: text("duration_of_disease"),
        previous_occupation: text("previous_occupation"),
        ..PatientForm::default()
    }
}

/// Map free-text sex to the stored code: `F`, `M` or empty.
///
/// "female" is checked first since it contains "male".
pub fn map_gender(raw: &str) -> &'static str {
    let lower = raw.trim().to_lowercase();
    if lower.contains("female") || lower == "f" {
        "F"
    } else if lower.contains("male") || lower == "m" {
        "M"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeExtraction, PNG_BYTES};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_gender_mapping() {
        for male in ["Male", "m", "MALE", " male "] {
            assert_eq!(map_gender(male), "M", "{male}");
        }
        for female in ["Female", "f", "FEMALE"] {
            assert_eq!(map_gender(female), "F", "{female}");
        }
        for other in ["", "x", "unknown", "mf"] {
            assert_eq!(map_gender(other), "", "{other}");
        }
    }

    #[test]
    fn test_maps_known_keys() {
        let form = map_extracted(&json!({
            "registration_number": "REG-2024-0200",
            "name": "Sunil Rao",
            "date_of_birth": "05/03/99",
            "age": 25,
            "sex": "Male",
            "mobile_number": "9123456780",
            "aadhar_number": "1111 2222 3333",
            "mother's_name": "Lakshmi",
            "leprosy_type": "PB",
            "date_of_admission": "1/2/2024",
            "unrelated": "ignored"
        }));

        assert_eq!(form.reg_no, "REG-2024-0200");
        assert_eq!(form.dob, "1999-03-05");
        assert_eq!(form.age, "25");
        assert_eq!(form.sex, "M");
        assert_eq!(form.mothers_name, "Lakshmi");
        assert_eq!(form.mb_or_pb_status, "PB");
        assert_eq!(form.date_of_admission, "2024-02-01");
        assert_eq!(form.disability_status, "");
        assert!(form.other_ailments.is_empty());
    }

    #[test]
    fn test_malformed_response_degrades_to_empty() {
        assert_eq!(map_extracted(&json!("not an object")), PatientForm::default());
        let form = map_extracted(&json!({"name": null, "age": "41", "date_of_birth": "1999-03-05"}));
        assert_eq!(form.name, "");
        assert_eq!(form.age, "41");
        assert_eq!(form.dob, "");
    }

    #[tokio::test]
    async fn test_select_upload_and_use() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("card.png");
        std::fs::write(&path, PNG_BYTES).expect("write image");

        let api = FakeExtraction::returning(json!({"name": "Asha", "sex": "f"}));
        let mut helper = ExtractionHelper::new();
        let preview = helper.select_file(&path).await.expect("png should be accepted");
        assert_eq!(
            preview,
            ImagePreview {
                file_name: "card.png".into(),
                mime_type: "image/png".into(),
                size: PNG_BYTES.len(),
            }
        );
        assert!(api.uploads().is_empty());

        helper.upload(&api).await.expect("upload should succeed");
        let form = helper.use_data().expect("data should be available");
        assert_eq!(form.name, "Asha");
        assert_eq!(form.sex, "F");
        assert_eq!(api.uploads()[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_non_image_is_rejected_before_upload() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").expect("write file");

        let mut helper = ExtractionHelper::new();
        let err = helper.select_file(&path).await.expect_err("should reject");
        assert!(matches!(err, RecordsError::NotAnImage(name) if name == "notes.txt"));

        let api = FakeExtraction::returning(json!({}));
        let err = helper.upload(&api).await.expect_err("nothing selected");
        assert!(matches!(err, RecordsError::NoImageSelected));
        assert!(api.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_selection() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("card.png");
        std::fs::write(&path, PNG_BYTES).expect("write image");

        let api = FakeExtraction::returning(json!({}));
        api.set_failing(true);
        let mut helper = ExtractionHelper::new();
        helper.select_file(&path).await.expect("png should be accepted");

        assert!(helper.upload(&api).await.is_err());
        assert!(helper.preview().is_some());
        assert!(helper.use_data().is_none());
    }
}
