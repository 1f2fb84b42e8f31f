//! HTML for the lookup and submission forms.

use crate::{mla, types::book_record::BookRecord};

/// Message shown beneath a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Belongs next to the named input field.
    Field { field: &'static str, message: String },
    Error(String),
    Success(String),
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes the citation and renders its `*...*` markers as italics.
///
/// An unpaired trailing marker is kept as a literal `*` so no tag is left open.
pub fn citation_html(citation: &str) -> String {
    let escaped = escape_html(citation);
    let parts = escaped.split('*').collect::<Vec<_>>();
    let paired = parts.len() % 2 == 1;
    let mut out = String::with_capacity(escaped.len() + 8);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            let opening = i % 2 == 1;
            if opening && !paired && i == parts.len() - 1 {
                out.push('*');
            } else {
                out.push_str(if opening { "<i>" } else { "</i>" });
            }
        }
        out.push_str(part);
    }
    out
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>ISBN citation lookup</title>
</head>
<body>
<main>
<h1>ISBN citation lookup</h1>
{body}
</main>
</body>
</html>
"#
    )
}

fn notice_html(notice: Option<&Notice>, field: Option<&str>) -> String {
    match notice {
        Some(Notice::Field { field: f, message }) if Some(*f) == field => {
            format!(r#"<p class="field-error" id="{f}-error">{}</p>"#, escape_html(message))
        }
        Some(Notice::Error(message)) if field.is_none() => {
            format!(r#"<p class="error">{}</p>"#, escape_html(message))
        }
        Some(Notice::Success(message)) if field.is_none() => {
            format!(r#"<p class="success">{}</p>"#, escape_html(message))
        }
        _ => String::new(),
    }
}

fn isbn_form(isbn: &str, notice: Option<&Notice>) -> String {
    format!(
        r#"<form method="post" action="/cite">
<label for="isbn">ISBN</label>
<input type="text" id="isbn" name="isbn" value="{}" minlength="10" pattern="[0-9Xx\-]+" required>
<button type="submit">Look up</button>
{}
</form>"#,
        escape_html(isbn),
        notice_html(notice, Some("isbn")),
    )
}

fn submit_form(citation: &str, quantity: &str, notice: Option<&Notice>) -> String {
    format!(
        r#"<form method="post" action="/submit">
<input type="hidden" name="citation" value="{}">
<label for="quantity">Quantity</label>
<input type="number" id="quantity" name="quantity" value="{}" min="1" step="1" required>
<button type="submit">Submit citation</button>
{}
</form>"#,
        escape_html(citation),
        escape_html(quantity),
        notice_html(notice, Some("quantity")),
    )
}

/// The empty lookup form, or the form again with a lookup error.
pub fn index(isbn: &str, notice: Option<&Notice>) -> String {
    layout(&format!("{}\n{}", isbn_form(isbn, notice), notice_html(notice, None)))
}

pub fn record(isbn: &str, record: &BookRecord) -> String {
    let mut body = isbn_form(isbn, None);
    body.push_str("\n<section class=\"book\">\n");
    if let Some(url) = record.image_url() {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"Cover\">\n",
            escape_html(url)
        ));
    }
    body.push_str("<dl>\n");
    let fields = [
        ("Title", record.title()),
        ("Author", record.author()),
        ("Edition", record.edition().filter(|e| *e != "1")),
        ("Publisher", record.publisher()),
        ("Year", record.year()),
        ("ISBN-13", record.isbn13()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            body.push_str(&format!("<dt>{label}</dt><dd>{}</dd>\n", escape_html(value)));
        }
    }
    body.push_str("</dl>\n");
    if let Some(citation) = record.mla_citation() {
        body.push_str(&format!(
            "<p class=\"citation\">{}</p>\n{}\n",
            citation_html(citation),
            submit_form(&mla::plain_text(citation), "1", None)
        ));
    }
    body.push_str("</section>");
    layout(&body)
}

/// Outcome of a relay submission, keeping the citation so the user can retry.
pub fn submission(citation: &str, quantity: &str, notice: &Notice) -> String {
    let mut body = isbn_form("", None);
    body.push_str(&format!(
        "\n<p class=\"citation\">{}</p>\n",
        citation_html(citation)
    ));
    body.push_str(&submit_form(&mla::plain_text(citation), quantity, Some(notice)));
    body.push('\n');
    body.push_str(&notice_html(Some(notice), None));
    layout(&body)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{isbn::Isbn, RawRecord};

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn italics() {
        assert_eq!(
            citation_html("Silberschatz, Abraham. *Operating System Concepts*. 9th ed., Wiley, 2012."),
            "Silberschatz, Abraham. <i>Operating System Concepts</i>. 9th ed., Wiley, 2012."
        );
        assert_eq!(citation_html("A. *<B>*."), "A. <i>&lt;B&gt;</i>.");
    }

    #[test]
    fn unpaired_marker_is_left_alone() {
        assert_eq!(citation_html("A. *B*. C *D"), "A. <i>B</i>. C *D");
        assert_eq!(citation_html("no markers"), "no markers");
    }

    fn found(edition: &str) -> BookRecord {
        let raw = RawRecord {
            title: Some("Operating System Concepts (9th Edition)".into()),
            author: Some("Silberschatz, Abraham".into()),
            edition: Some(edition.into()),
            publisher: Some("Wiley".into()),
            year: Some("2012".into()),
            ..RawRecord::default()
        };
        BookRecord::finish(raw, &Isbn::parse("978-0136019701").unwrap())
    }

    #[test]
    fn submit_form_carries_plain_text() {
        let html = record("978-0136019701", &found("9"));
        assert!(html.contains(
            r#"name="citation" value="Silberschatz, Abraham. Operating System Concepts. 9th ed., Wiley, 2012.""#
        ));
        assert!(html.contains("<i>Operating System Concepts</i>"));

        let notice = Notice::Success("Citation submitted.".into());
        let html = submission("A. *B*. C, 2020.", "2", &notice);
        assert!(html.contains(r#"name="citation" value="A. B. C, 2020.""#));
    }

    #[test]
    fn first_edition_is_not_listed() {
        assert!(!record("978-0136019701", &found("1")).contains("<dt>Edition</dt>"));
        assert!(record("978-0136019701", &found("9")).contains("<dt>Edition</dt><dd>9</dd>"));
    }

    #[test]
    fn field_errors_sit_next_to_their_field() {
        let notice = Notice::Field {
            field:   "isbn",
            message: "ISBN must be at least 10 characters long.".into(),
        };
        let html = index("123", Some(&notice));
        assert!(html.contains(r#"<p class="field-error" id="isbn-error">ISBN must be at least 10 characters long.</p>"#));
        assert!(!html.contains(r#"class="error""#));
    }
}
