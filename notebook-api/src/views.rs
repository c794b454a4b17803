/// Server-rendered HTML pages
///
/// Pages are plain `format!` strings around a shared layout. Every value that
/// came from a user goes through [`escape`].

use crate::{error::FieldErrors, forms::RecordForm, resources::Resource};
use notebook_shared::models::record::Record;

/// Escapes text for use in HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, username: Option<&str>, body: &str) -> String {
    let account = match username {
        Some(name) => format!(
            r#"<span class="user">{}</span> <a href="/logout/">Log out</a>"#,
            escape(name)
        ),
        None => r#"<a href="/login/">Log in</a> <a href="/register/">Register</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Notes</a> <a href="/posts/">Posts</a> {account}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="errorlist">{}</ul>"#, items)
}

fn text_input(name: &str, label: &str, kind: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}:</label> <input type="{kind}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = error_list(errors.field(name)),
        value = escape(value),
    )
}

pub fn record_list<E: Resource>(records: &[Record<E>], username: &str) -> String {
    let items = if records.is_empty() {
        format!("<p>No {} yet.</p>", E::PLURAL_LABEL.to_lowercase())
    } else {
        let rows: String = records
            .iter()
            .map(|r| {
                format!(
                    r#"<li><a href="{}">{}</a></li>"#,
                    E::detail_path(r.id),
                    escape(&r.title)
                )
            })
            .collect();
        format!("<ul>{}</ul>", rows)
    };

    let body = format!(
        r#"<h1>{label}</h1>
{items}
<p><a href="{new}">New {name}</a></p>"#,
        label = E::PLURAL_LABEL,
        new = E::new_path(),
        name = E::NAME,
    );

    layout(E::PLURAL_LABEL, Some(username), &body)
}

pub fn record_detail<E: Resource>(record: &Record<E>, username: &str) -> String {
    let body = format!(
        r#"<article>
<h1>{title}</h1>
<p class="meta">Created {created}, last modified {modified}</p>
<div class="content">{content}</div>
</article>
<p><a href="{edit}">Edit</a> <a href="{delete}">Delete</a> <a href="{list}">Back</a></p>"#,
        title = escape(&record.title),
        created = record.created_at.format("%Y-%m-%d %H:%M"),
        modified = record.modified_at.format("%Y-%m-%d %H:%M"),
        content = escape(&record.content),
        edit = E::edit_path(record.id),
        delete = E::delete_path(record.id),
        list = E::LIST_PATH,
    );

    layout(&record.title, Some(username), &body)
}

/// Create or edit form, posting to `action`
pub fn record_form<E: Resource>(
    heading: &str,
    action: &str,
    form: &E::Form,
    errors: &FieldErrors,
    username: &str,
) -> String {
    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
{non_field}{title}
<p>{content_errors}<label for="id_content">Content:</label> <textarea name="content" id="id_content">{content}</textarea></p>
<button type="submit">Save</button>
</form>"#,
        heading = escape(heading),
        non_field = error_list(errors.non_field()),
        title = text_input("title", "Title", "text", form.title(), errors),
        content_errors = error_list(errors.field("content")),
        content = escape(form.content()),
    );

    layout(heading, Some(username), &body)
}

pub fn record_confirm_delete<E: Resource>(record: &Record<E>, username: &str) -> String {
    let body = format!(
        r#"<h1>Delete {name}</h1>
<p>Are you sure you want to delete this {name}?</p>
<dl>
<dt>ID</dt><dd>{id}</dd>
<dt>Title</dt><dd>{title}</dd>
<dt>Content</dt><dd>{content}</dd>
</dl>
<form method="post" action="{action}">
<button type="submit">Confirm</button>
</form>
<p><a href="{detail}">Cancel</a></p>"#,
        name = E::NAME,
        id = record.id,
        title = escape(&record.title),
        content = escape(&record.content),
        action = E::delete_path(record.id),
        detail = E::detail_path(record.id),
    );

    layout(&format!("Delete {}", E::NAME), Some(username), &body)
}

pub fn login_page(username: &str, next: &str, errors: &FieldErrors) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="/login/">
{non_field}{username}
{password}
<input type="hidden" name="next" value="{next}">
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register/">Register</a></p>"#,
        non_field = error_list(errors.non_field()),
        username = text_input("username", "Username", "text", username, errors),
        password = text_input("password", "Password", "password", "", errors),
        next = escape(next),
    );

    layout("Log in", None, &body)
}

pub fn register_page(username: &str, email: &str, errors: &FieldErrors) -> String {
    let body = format!(
        r#"<h1>Register</h1>
<form method="post" action="/register/">
{non_field}{username}
{email}
{password1}
{password2}
<button type="submit">Register</button>
</form>"#,
        non_field = error_list(errors.non_field()),
        username = text_input("username", "Username", "text", username, errors),
        email = text_input("email", "Email", "email", email, errors),
        password1 = text_input("password1", "Password", "password", "", errors),
        password2 = text_input("password2", "Password confirmation", "password", "", errors),
    );

    layout("Register", None, &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(title), escape(message));
    layout(title, None, &body)
}
