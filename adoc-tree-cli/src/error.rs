use adoc_tree::{Location, Warning};
use miette::{Diagnostic, NamedSource, SourceSpan};

/// A parser warning rendered against the document it was found in
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(severity(Warning))]
pub(crate) struct RichWarning {
    message: String,

    #[help]
    advice: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("{position_advice}")]
    span: SourceSpan,
    position_advice: String,
}

fn source_span_from_location(location: &Location) -> SourceSpan {
    SourceSpan::new(location.absolute_start.into(), location.len())
}

pub(crate) fn warning_report(name: &str, source: &str, warning: &Warning) -> miette::Report {
    let location = warning.location();
    let line = location.start.line;
    let column = location.start.column;
    miette::Report::new(RichWarning {
        message: warning.to_string(),
        advice: warning.advice().to_string(),
        src: NamedSource::new(name, source.to_string()),
        span: source_span_from_location(location),
        position_advice: format!("found here (line {line}, column {column})"),
    })
}

/// Print `e` to stderr, with advice when it wraps a parser error.
pub(crate) fn display(e: &anyhow::Error) {
    eprintln!("Error: {e}");
    for cause in e.chain().skip(1) {
        eprintln!("  × {cause}");
    }
    if let Some(advice) = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<adoc_tree::Error>())
        .and_then(adoc_tree::Error::advice)
    {
        eprintln!("  help: {advice}");
    }
}
