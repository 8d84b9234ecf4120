//! HTML rendering for the portal pages.
//!
//! Flash feedback is an explicit per-request value rendered straight
//! into the response; there is no session state.

use crate::intake::ComplaintForm;
use civica_common::Category;

/// One-shot user feedback rendered into the next response
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash success",
            FlashKind::Warning => "flash warning",
            FlashKind::Error => "flash error",
        }
    }
}

/// Render the complaint form page, optionally with a flash banner and
/// previously submitted values echoed back
pub fn complaint_page(flash: Option<&Flash>, form: &ComplaintForm) -> String {
    let banner = match flash {
        Some(f) => format!(
            r#"<div class="{}">{}</div>"#,
            f.css_class(),
            escape(&f.message)
        ),
        None => String::new(),
    };

    let mut options = String::new();
    for category in Category::ALL {
        let selected = if form.category == category.as_str() {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            category.as_str(),
            selected,
            category.label()
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>City Complaint Portal</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main>
<h1>Report a City Infrastructure Issue</h1>
{banner}
<form method="post" action="/">
<label for="name">Your name</label>
<input id="name" name="name" type="text" value="{name}">
<label for="contact">Email or phone</label>
<input id="contact" name="contact" type="text" value="{contact}">
<label for="category">Category</label>
<select id="category" name="category">
<option value="">-- choose --</option>
{options}
</select>
<label for="description">Description</label>
<textarea id="description" name="description" rows="5">{description}</textarea>
<button type="submit">Submit complaint</button>
</form>
</main>
</body>
</html>
"#,
        banner = banner,
        name = escape(&form.name),
        contact = escape(&form.contact),
        options = options,
        description = escape(&form.description),
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
