//! Classification of raw command-line tokens.

/// Dash style of a flag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Form {
    Short,
    Long,
}

/// A token that looks like a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptArg {
    /// Dashed name, e.g. `-p` or `--port`; the `=value` part is removed.
    pub(crate) name: String,
    /// Value attached with `=`.
    pub(crate) value: Option<String>,
    pub(crate) form: Form,
    /// Long name starts with `no-`. The table decides whether this is a
    /// negation.
    pub(crate) negated: bool,
    /// The value came from `--name=value`.
    pub(crate) equals: bool,
}

impl OptArg {
    /// Returns `None` for operands, i.e. tokens not starting with `-`.
    pub(crate) fn classify(token: &str) -> Option<Self> {
        if let Some(body) = token.strip_prefix("--") {
            let (name, value) = body
                .split_once('=')
                .map_or((body, None), |(name, value)| (name, Some(value.to_owned())));
            return Some(Self {
                name: format!("--{name}"),
                negated: name.starts_with("no-"),
                equals: value.is_some(),
                value,
                form: Form::Long,
            });
        }
        token.starts_with('-').then(|| Self {
            name: token.to_owned(),
            value: None,
            form: Form::Short,
            negated: false,
            equals: false,
        })
    }
}
