use std::io::Cursor;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::Luma;
use qrcode::QrCode;

use crate::model::qr_code::QrPayload;

/// Render a QR payload into a PNG and wrap it as a `data:` URL, the form
/// scanner frontends embed directly into an `<img>` tag.
pub fn to_data_url(payload: &QrPayload) -> Result<String> {
    let json = serde_json::to_string(payload).context("serialize QR payload")?;

    let code = QrCode::new(json.as_bytes()).context("encode QR matrix")?;
    let img = code.render::<Luma<u8>>().build();

    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("write QR PNG")?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_png_data_url() {
        let payload = QrPayload {
            student_id: "2021-00123".into(),
            full_name: "Juan Dela Cruz".into(),
            course: Some("BSCS".into()),
            lab_schedule: None,
        };

        let url = to_data_url(&payload).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let encoded = url.trim_start_matches("data:image/png;base64,");
        let bytes = STANDARD.decode(encoded).unwrap();
        // PNG signature
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }
}
