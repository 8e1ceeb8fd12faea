use super::*;

#[test]
fn data_url_encodes_base64_with_mime() {
    assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
}

#[test]
fn new_accepts_image_mime() {
    let upload = ImageUpload::new("torax.jpg", "image/jpeg", vec![1, 2, 3]).unwrap();
    assert_eq!(upload.file_name, "torax.jpg");
    assert_eq!(upload.content_type, "image/jpeg");
    assert!(upload.data_url.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn new_rejects_empty_payload() {
    assert_eq!(ImageUpload::new("a.png", "image/png", Vec::new()), Err(ImageError::Empty));
}

#[test]
fn new_rejects_non_image_mime() {
    assert_eq!(ImageUpload::new("notes.pdf", "application/pdf", vec![1]), Err(ImageError::NotAnImage));
}

#[test]
fn new_infers_mime_from_extension_when_blank() {
    let upload = ImageUpload::new("scan.PNG", "", vec![9]).unwrap();
    assert_eq!(upload.content_type, "image/png");
    assert_eq!(ImageUpload::new("scan.dcm", "", vec![9]), Err(ImageError::NotAnImage));
}

#[test]
fn new_defaults_blank_file_name() {
    let upload = ImageUpload::new("", "image/png", vec![1]).unwrap();
    assert_eq!(upload.file_name, "image.png");
}
