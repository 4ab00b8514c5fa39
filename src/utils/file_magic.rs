//! 上传文件的魔术字节校验
//!
//! 只校验文档上传允许的类型，白名单之外的扩展名一律拒绝。

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const PDF: &[u8] = b"%PDF";
// OLE Compound Document（.doc / .xls）
const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
// ZIP（OOXML 文档与 .zip）
const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// 扩展名（含点号）对应的文件头
fn signature_for(extension: &str) -> Option<&'static [u8]> {
    match extension {
        ".pdf" => Some(PDF),
        ".png" => Some(PNG),
        ".jpg" | ".jpeg" => Some(JPEG),
        ".doc" | ".xls" => Some(OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => Some(ZIP),
        _ => None,
    }
}

/// 校验文件首块内容与扩展名是否一致
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    signature_for(&extension.to_lowercase()).is_some_and(|sig| data.starts_with(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_document() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".PDF"));
        assert!(!validate_magic_bytes(b"%PDF-1.4", ".docx"));
    }

    #[test]
    fn test_office_documents() {
        let docx = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&docx, ".docx"));
        assert!(validate_magic_bytes(&docx, ".xlsx"));
        assert!(validate_magic_bytes(&docx, ".zip"));
        assert!(!validate_magic_bytes(&docx, ".doc"));

        let doc = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        assert!(validate_magic_bytes(&doc, ".doc"));
    }

    #[test]
    fn test_images() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(!validate_magic_bytes(&png, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
        assert!(!validate_magic_bytes(b"plain text", ".txt"));
        // 伪装成 PDF 的可执行文件
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".pdf"));
    }
}
