use crate::issue::{Comment, Issue};

/// Upper bound on comments included in a prompt.
pub const MAX_COMMENTS: usize = 5;

/// Build the text handed to the summarization model.
///
/// Only comments with a non-empty body count toward [`MAX_COMMENTS`], and
/// they keep the order the API returned them in.
pub fn build_prompt(issue: &Issue, comments: &[Comment]) -> String {
    let comments_text = comments
        .iter()
        .filter_map(|comment| match comment.body.as_deref() {
            Some(body) if !body.is_empty() => {
                Some(format!("Comment by {}: {}", comment.author_login, body))
            }
            _ => None,
        })
        .take(MAX_COMMENTS)
        .collect::<Vec<_>>()
        .join("\n\n");

    let comments_section = if comments_text.is_empty() {
        "No comments"
    } else {
        comments_text.as_str()
    };

    format!(
        "\nISSUE TITLE: {}\nISSUE BODY: {}\nCOMMENTS: {}\n",
        issue.title,
        issue.body.as_deref().unwrap_or_default(),
        comments_section
    )
}
