//! Server-rendered HTML for the librarian page

use crate::models::{Book, Recommendation, User};

/// Inline status message shown at the top of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Everything one render of the page needs beyond the table contents
#[derive(Debug, Clone, Default)]
pub struct PageView {
    pub notices: Vec<Notice>,
    pub selected_user: Option<String>,
    pub user_query: String,
    pub recommendation: Option<Recommendation>,
    pub email_body: Option<String>,
}

impl PageView {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            notices: vec![Notice::Success(message.into())],
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notices: vec![Notice::Error(message.into())],
            ..Self::default()
        }
    }
}

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_page(view: &PageView, users: &[User], books: &[Book]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Library Recommendation Demo</title>\n<style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         table { border-collapse: collapse; margin-bottom: 1rem; }\n\
         td, th { border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: left; }\n\
         .success { color: #1a7f37; }\n.error { color: #cf222e; }\n\
         </style>\n</head>\n<body>\n<h1>Library Recommendation Demo</h1>\n",
    );

    for notice in &view.notices {
        match notice {
            Notice::Success(message) => {
                html.push_str(&format!("<p class=\"success\">{}</p>\n", escape(message)))
            }
            Notice::Error(message) => {
                html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)))
            }
        }
    }

    render_users(&mut html, users);
    render_books(&mut html, books);
    render_recommendations(&mut html, view, users);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_users(html: &mut String, users: &[User]) {
    html.push_str(
        "<h2>Add a New User</h2>\n\
         <form method=\"post\" action=\"/users\">\n\
         <label>Name <input name=\"name\"></label>\n\
         <label>Email <input name=\"email\"></label>\n\
         <label>Address <input name=\"address\"></label>\n\
         <button type=\"submit\">Add User</button>\n</form>\n\
         <h3>Current Users</h3>\n",
    );

    if users.is_empty() {
        html.push_str("<p>No users in the system yet.</p>\n");
        return;
    }

    html.push_str("<table>\n<tr><th>user_id</th><th>name</th><th>email</th><th>address</th></tr>\n");
    for user in users {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            user.user_id,
            escape(&user.name),
            escape(&user.email),
            escape(&user.address)
        ));
    }
    html.push_str("</table>\n");
}

fn render_books(html: &mut String, books: &[Book]) {
    html.push_str(
        "<h2>Add a New Book to the Catalog</h2>\n\
         <form method=\"post\" action=\"/books\">\n\
         <label>Book Title <input name=\"title\"></label>\n\
         <label>Author <input name=\"author\"></label>\n\
         <label>Genre <input name=\"genre\"></label>\n\
         <label>Description <textarea name=\"description\"></textarea></label>\n\
         <button type=\"submit\">Add Book</button>\n</form>\n\
         <h3>Current Catalog in the System</h3>\n",
    );

    if books.is_empty() {
        html.push_str("<p>No books in the catalog yet.</p>\n");
        return;
    }

    html.push_str(
        "<table>\n<tr><th>book_id</th><th>title</th><th>author</th><th>genre</th><th>description</th></tr>\n",
    );
    for book in books {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            book.book_id,
            escape(&book.title),
            escape(&book.author),
            escape(&book.genre),
            escape(&book.description)
        ));
    }
    html.push_str("</table>\n");
}

fn render_recommendations(html: &mut String, view: &PageView, users: &[User]) {
    html.push_str("<h2>Ask the Library Assistant for Recommendations</h2>\n");

    if users.is_empty() {
        return;
    }

    html.push_str(
        "<form method=\"post\" action=\"/recommend\">\n\
         <label>Select a user for recommendations <select name=\"user_name\">\n",
    );
    let mut seen = Vec::new();
    for user in users {
        // Names are not unique; the first match wins on lookup anyway.
        if seen.contains(&&user.name) {
            continue;
        }
        seen.push(&user.name);
        let selected = view.selected_user.as_deref() == Some(user.name.as_str());
        html.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape(&user.name),
            if selected { " selected" } else { "" }
        ));
    }
    html.push_str(&format!(
        "</select></label>\n\
         <label>Enter your question or reading preference here \
         <textarea name=\"user_query\">{}</textarea></label>\n\
         <button type=\"submit\">Get Recommendations</button>\n</form>\n",
        escape(&view.user_query)
    ));

    let Some(rec) = &view.recommendation else {
        return;
    };
    let user_name = view.selected_user.as_deref().unwrap_or_default();

    html.push_str(&format!(
        "<div class=\"recommendation\">\n<p><strong>Recommendation:</strong></p>\n\
         <p><strong>Title:</strong> {}</p>\n\
         <p><strong>Book ID:</strong> {}</p>\n\
         <p><strong>Synopsis:</strong> {}</p>\n\
         <p><strong>Why You Might Like It:</strong> {}</p>\n\
         <p><strong>User Grade:</strong> {}</p>\n",
        escape(&rec.title),
        rec.book_id,
        escape(&rec.synopsis),
        escape(&rec.feedback),
        rec.grade
    ));

    for (action, label) in [
        ("/recommend/email", "Send Recommendation via Email"),
        ("/recommend/checkout", "Checkout Book"),
    ] {
        html.push_str(&format!("<form method=\"post\" action=\"{}\">\n", action));
        html.push_str(&recommendation_fields(user_name, rec));
        html.push_str(&format!("<button type=\"submit\">{}</button>\n</form>\n", label));
    }

    if let Some(body) = &view.email_body {
        html.push_str(&format!("<p>Email Body:</p>\n<pre>{}</pre>\n", escape(body)));
    }

    html.push_str("</div>\n");
}

/// Hidden inputs that carry the recommendation into the next request
fn recommendation_fields(user_name: &str, rec: &Recommendation) -> String {
    let fields = [
        ("user_name", escape(user_name)),
        ("title", escape(&rec.title)),
        ("book_id", rec.book_id.to_string()),
        ("feedback", escape(&rec.feedback)),
        ("grade", rec.grade.to_string()),
        ("synopsis", escape(&rec.synopsis)),
        ("summarized_email_body", escape(&rec.summarized_email_body)),
    ];

    fields
        .iter()
        .map(|(name, value)| {
            format!("<input type=\"hidden\" name=\"{}\" value=\"{}\">\n", name, value)
        })
        .collect()
}
