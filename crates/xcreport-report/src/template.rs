//! Placeholder-based template rendering.
//!
//! Every renderable entity implements [`Html`]: it exposes a template string
//! containing `[[TOKEN]]` placeholders and a map from token name to the text
//! that replaces it. Containers render their children first and inject the
//! concatenated output into one of their own placeholders, so rendering a
//! [`Report`](crate::Report) walks the whole tree depth-first.
//!
//! Rendering never caches anything: output is a pure function of the entity
//! and the [`RenderContext`] it is rendered with.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::aggregate::Filter;

/// Token name to replacement text.
pub type Placeholders = BTreeMap<&'static str, String>;

/// Matches a `[[TOKEN]]` placeholder and captures the token name.
static PLACEHOLDER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\[\[([A-Z0-9_\-]+)\]\]").ok());

/// Container `<div>` elements whose injected content ended up empty.
static EMPTY_CONTAINER: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*<div id="[^"]*" class="[^"]*">\s*</div>[ \t]*\r?\n?"#).ok()
});

/// Paperclip markers hidden because the activity has no attachments.
static HIDDEN_PAPERCLIP: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*<span class="icon paperclip-icon" style="display: none"></span>[ \t]*\r?\n?"#,
    )
    .ok()
});

/// Upper bound on finishing passes; each pass can only empty one more level.
const MAX_FINISHING_PASSES: usize = 32;

/// Parameters threaded through a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Test-name selection applied at every level of the tree.
    pub filter: Filter<'a>,

    /// Hide the run summary header (counts and log link).
    pub hide_run_header: bool,
}

impl<'a> RenderContext<'a> {
    /// Context for the full, unfiltered report.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            filter: Filter::none(),
            hide_run_header: false,
        }
    }

    /// Context for a report isolated to the tests named `name`.
    #[must_use]
    pub const fn isolated(name: &'a str) -> Self {
        Self {
            filter: Filter::name(name),
            hide_run_header: true,
        }
    }
}

/// An entity that can be rendered to HTML.
pub trait Html {
    /// Template string with `[[TOKEN]]` placeholders.
    fn html_template(&self) -> &'static str;

    /// Replacement text for each placeholder of [`Html::html_template`].
    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders;

    /// Renders the entity by substituting its placeholders into its template.
    fn html(&self, ctx: &RenderContext<'_>) -> String {
        let template = self.html_template();
        if template.is_empty() {
            return String::new();
        }
        render_template(template, &self.html_placeholder_values(ctx))
    }
}

impl<T: Html + ?Sized> Html for &T {
    fn html_template(&self) -> &'static str {
        (**self).html_template()
    }

    fn html_placeholder_values(&self, ctx: &RenderContext<'_>) -> Placeholders {
        (**self).html_placeholder_values(ctx)
    }

    fn html(&self, ctx: &RenderContext<'_>) -> String {
        (**self).html(ctx)
    }
}

/// Renders every item in order and concatenates the output.
pub fn render_all<T: Html>(items: impl IntoIterator<Item = T>, ctx: &RenderContext<'_>) -> String {
    items.into_iter().map(|item| item.html(ctx)).collect()
}

/// Substitutes every known `[[TOKEN]]` in `template`.
///
/// Substitution is a single pass over the template: replacement text is never
/// rescanned, and tokens without a value are left as they are.
pub fn render_template(template: &str, values: &Placeholders) -> String {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };

    re.replace_all(template, |caps: &Captures<'_>| {
        values
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Removes template artifacts from a fully composed document.
///
/// Strips container divs left empty by their placeholder and paperclip
/// markers hidden for activities without attachments. Removing an inner
/// container can leave its parent empty, so passes repeat until stable.
pub fn finish(html: &str) -> String {
    let mut current = match HIDDEN_PAPERCLIP.as_ref() {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    };

    let Some(re) = EMPTY_CONTAINER.as_ref() else {
        return current;
    };

    for _ in 0..MAX_FINISHING_PASSES {
        let next = re.replace_all(&current, "");
        if next.len() == current.len() {
            break;
        }
        current = next.into_owned();
    }

    current
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }

    result
}

/// Formats a duration in seconds for display.
///
/// Examples:
/// - 0.5 seconds -> "0.50s"
/// - 65 seconds -> "1m 5s"
/// - 3661 seconds -> "1h 1m 1s"
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0.00s".to_string();
    }
    if seconds < 60.0 {
        return format!("{seconds:.2}s");
    }

    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();

    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }

    parts.join(" ")
}
