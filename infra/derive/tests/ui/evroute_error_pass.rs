use evroute_derive::evroute_error;
use std::borrow::Cow;

#[evroute_error]
pub enum ManifestError {
    #[error("Manifest I/O{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_manifest() -> Result<String, ManifestError> {
    let raw = std::fs::read_to_string("missing-manifest.toml").context("Reading manifest")?;
    Ok(raw)
}

fn main() {
    let err = read_manifest().unwrap_err();
    assert!(err.to_string().contains("(Reading manifest)"));

    let internal: ManifestError = "broken".into();
    assert_eq!(internal.to_string(), "Internal error: broken");
}
