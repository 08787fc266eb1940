//! Naming policy for raw file uploads: MIME type to extension, and the
//! effective stored filename.

/// Extension used when the MIME type is absent or unknown
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Base name used when the caller supplies no filename
pub const DEFAULT_BASENAME: &str = "file";

/// Preferred extension for types where the MIME database lists several
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
    ("application/vnd.ms-excel", "xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    ("application/vnd.ms-powerpoint", "ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
    ),
    ("application/vnd.oasis.opendocument.text", "odt"),
    ("application/rtf", "rtf"),
    ("text/rtf", "rtf"),
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("text/markdown", "md"),
    ("text/html", "html"),
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    ("application/zip", "zip"),
    ("image/jpeg", "jpeg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
    ("image/tiff", "tiff"),
    ("image/bmp", "bmp"),
    ("application/octet-stream", "bin"),
    ("application/gzip", "gz"),
    ("text/javascript", "js"),
    ("application/javascript", "js"),
    ("text/css", "css"),
    ("audio/mpeg", "mp3"),
    ("audio/mp4", "m4a"),
    ("audio/wav", "wav"),
    ("video/mp4", "mp4"),
    ("video/webm", "webm"),
    ("video/quicktime", "mov"),
];

/// Maps a MIME type to a file extension. Never fails: absent, malformed or
/// unrecognized types resolve to [`DEFAULT_EXTENSION`].
pub fn resolve_extension(mimetype: Option<&str>) -> &'static str {
    let Some(essence) = mimetype.map(mime_essence).filter(|m| !m.is_empty()) else {
        return DEFAULT_EXTENSION;
    };

    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(mime, _)| *mime == essence) {
        return ext;
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|exts| round_trip_extension(exts, &essence).or_else(|| exts.first().copied()))
        .unwrap_or(DEFAULT_EXTENSION)
}

/// First extension whose own primary MIME type is `essence`. The database
/// lists extensions alphabetically, so the first entry is often an alias.
fn round_trip_extension(exts: &[&'static str], essence: &str) -> Option<&'static str> {
    exts.iter().copied().find(|ext| {
        mime_guess::from_ext(ext)
            .first()
            .is_some_and(|mime| mime.essence_str() == essence)
    })
}

/// Filename the asset is stored under.
///
/// The caller's name is kept verbatim when it already ends with `.<ext>`
/// (case-sensitive), otherwise `.<ext>` is appended.
pub fn effective_filename(filename: Option<&str>, ext: &str) -> String {
    let suffix = format!(".{}", ext);
    match filename {
        Some(name) if name.ends_with(&suffix) => name.to_string(),
        Some(name) => format!("{}{}", name, suffix),
        None => format!("{}{}", DEFAULT_BASENAME, suffix),
    }
}

/// `type/subtype` without parameters, lowercased
fn mime_essence(mimetype: &str) -> String {
    mimetype
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_types() {
        assert_eq!(resolve_extension(Some("application/pdf")), "pdf");
        assert_eq!(resolve_extension(Some("application/msword")), "doc");
        assert_eq!(
            resolve_extension(Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )),
            "docx"
        );
        assert_eq!(resolve_extension(Some("text/plain; charset=utf-8")), "txt");
        assert_eq!(resolve_extension(Some("IMAGE/PNG")), "png");
    }

    #[test]
    fn test_mime_database_fallback() {
        // Not in the preferred table, resolved through the MIME database
        assert_eq!(resolve_extension(Some("application/x-7z-compressed")), "7z");
    }

    #[test]
    fn test_common_upload_types() {
        assert_eq!(resolve_extension(Some("application/octet-stream")), "bin");
        assert_eq!(resolve_extension(Some("audio/mpeg")), "mp3");
        assert_eq!(resolve_extension(Some("text/javascript")), "js");
        assert_eq!(resolve_extension(Some("application/javascript")), "js");
        assert_eq!(resolve_extension(Some("video/mp4")), "mp4");
        assert_eq!(resolve_extension(Some("image/tiff")), "tiff");

        let ext = resolve_extension(Some("audio/mpeg"));
        assert_eq!(effective_filename(Some("song.mp3"), ext), "song.mp3");
        let ext = resolve_extension(Some("application/octet-stream"));
        assert_eq!(effective_filename(Some("resume"), ext), "resume.bin");
    }

    #[test]
    fn test_fallback_prefers_round_trip_extension() {
        assert_eq!(round_trip_extension(&["not-an-ext", "mp3"], "audio/mpeg"), Some("mp3"));
        assert_eq!(round_trip_extension(&["not-an-ext"], "audio/mpeg"), None);

        for mime in ["application/x-7z-compressed", "video/x-msvideo"] {
            let ext = resolve_extension(Some(mime));
            assert_eq!(
                mime_guess::from_ext(ext).first().map(|m| m.essence_str().to_string()),
                Some(mime.to_string())
            );
        }
    }

    #[test]
    fn test_missing_or_unknown_type_defaults_to_pdf() {
        assert_eq!(resolve_extension(None), "pdf");
        assert_eq!(resolve_extension(Some("")), "pdf");
        assert_eq!(resolve_extension(Some(";")), "pdf");
        assert_eq!(resolve_extension(Some("not a mime type")), "pdf");
        assert_eq!(resolve_extension(Some("application/x-made-up-type")), "pdf");
    }

    #[test]
    fn test_effective_filename() {
        assert_eq!(effective_filename(Some("resume"), "pdf"), "resume.pdf");
        assert_eq!(effective_filename(Some("resume.pdf"), "pdf"), "resume.pdf");
        assert_eq!(effective_filename(Some("resume.docx"), "pdf"), "resume.docx.pdf");
        assert_eq!(effective_filename(Some("Resume.PDF"), "pdf"), "Resume.PDF.pdf");
        assert_eq!(effective_filename(None, "txt"), "file.txt");
    }

    fn basename() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-]{1,24}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_unknown_mime_types_default_to_pdf(
            top in "x-unknown-[a-z]{1,8}",
            sub in "[a-z0-9.+-]{1,16}",
        ) {
            let mime = format!("{}/{}", top, sub);
            prop_assert_eq!(resolve_extension(Some(&mime)), DEFAULT_EXTENSION);
        }

        #[test]
        fn prop_arbitrary_input_never_panics(input in ".{0,64}") {
            let ext = resolve_extension(Some(&input));
            prop_assert!(!ext.is_empty());
        }

        #[test]
        fn prop_existing_extension_is_not_doubled(name in basename()) {
            let ext = resolve_extension(Some("application/pdf"));
            let filename = format!("{}.{}", name, ext);
            prop_assert_eq!(effective_filename(Some(&filename), ext), filename);
        }

        #[test]
        fn prop_missing_extension_is_appended(name in basename()) {
            let ext = resolve_extension(Some("text/csv"));
            prop_assert_eq!(effective_filename(Some(&name), ext), format!("{}.{}", name, ext));
        }

        #[test]
        fn prop_absent_filename_uses_default_basename(
            mime in prop_oneof![
                Just("application/pdf"),
                Just("text/plain"),
                Just("application/zip"),
            ],
        ) {
            let ext = resolve_extension(Some(mime));
            prop_assert_eq!(effective_filename(None, ext), format!("{}.{}", DEFAULT_BASENAME, ext));
        }
    }
}
