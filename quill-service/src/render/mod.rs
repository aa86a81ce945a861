/// HTML rendering
///
/// Presentation is deliberately thin: plain string builders over the model
/// structs, with escaping. Every dynamic value passes through `escape`.
use crate::forms::FieldErrors;
use crate::models::{CommentDetail, Group, PostDetail, User};
use crate::pagination::Page;

/// Escape a value for interpolation into HTML text or attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page shell with the navigation bar.
fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let nav_auth = match user {
        Some(user) => format!(
            r#"<a href="/{username}/">{username}</a> <a href="/new/">New post</a> <a href="/follow/">Feed</a> <form class="inline" method="post" action="/auth/logout/"><button type="submit">Log out</button></form>"#,
            username = escape(&user.username)
        ),
        None => r#"<a href="/auth/login/">Log in</a> <a href="/auth/signup/">Sign up</a>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Quill</title>
</head>
<body>
<nav><a href="/">Quill</a> | {nav_auth}</nav>
<main>
{body}
</main>
<footer><a href="/about/author/">About the author</a> <a href="/about/tech/">Technology</a></footer>
</body>
</html>
"#,
        title = escape(title),
        nav_auth = nav_auth,
        body = body,
    )
}

/// Previous/next links plus the page counter.
fn pager<T>(page: &Page<T>, base_path: &str) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut out = String::from(r#"<div class="pager">"#);
    if page.has_previous() {
        out.push_str(&format!(
            r#"<a href="{}?page={}">previous</a> "#,
            escape(base_path),
            page.number - 1
        ));
    }
    out.push_str(&format!(
        "<span>page {} of {}</span>",
        page.number, page.num_pages
    ));
    if page.has_next() {
        out.push_str(&format!(
            r#" <a href="{}?page={}">next</a>"#,
            escape(base_path),
            page.number + 1
        ));
    }
    out.push_str("</div>");
    out
}

/// One post in a listing.
fn post_card(post: &PostDetail) -> String {
    let mut out = String::from(r#"<article class="post">"#);
    out.push_str(&format!(
        r#"<header><a href="/{author}/">{author}</a> <time>{date}</time>"#,
        author = escape(&post.author_username),
        date = post.published_at.format("%Y-%m-%d %H:%M"),
    ));
    if let (Some(slug), Some(title)) = (&post.group_slug, &post.group_title) {
        out.push_str(&format!(
            r#" in <a href="/group/{}/">{}</a>"#,
            escape(slug),
            escape(title)
        ));
    }
    out.push_str("</header>");
    out.push_str(&format!("<p>{}</p>", escape(&post.text)));
    if let Some(image) = &post.image_path {
        out.push_str(&format!(r#"<img src="/media/{}" alt="">"#, escape(image)));
    }
    out.push_str(&format!(
        r#"<a href="/{}/{}/">view</a></article>"#,
        escape(&post.author_username),
        post.id
    ));
    out
}

fn post_list(page: &Page<PostDetail>, base_path: &str) -> String {
    let mut out = String::new();
    if page.items.is_empty() {
        out.push_str("<p>No posts yet.</p>");
    }
    for post in &page.items {
        out.push_str(&post_card(post));
    }
    out.push_str(&pager(page, base_path));
    out
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    match errors.get(field) {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

/// Site-wide listing.
pub fn index_page(user: Option<&User>, page: &Page<PostDetail>) -> String {
    let body = format!("<h1>Latest posts</h1>{}", post_list(page, "/"));
    layout("Latest posts", user, &body)
}

/// Personalized feed of followed authors' posts.
pub fn feed_page(user: &User, page: &Page<PostDetail>) -> String {
    let mut body = String::from("<h1>Your feed</h1>");
    if page.items.is_empty() && page.number == 1 {
        body.push_str("<p>Follow some authors to fill this page.</p>");
    }
    body.push_str(&post_list(page, "/follow/"));
    layout("Your feed", Some(user), &body)
}

/// Per-group listing.
pub fn group_page(user: Option<&User>, group: &Group, page: &Page<PostDetail>) -> String {
    let body = format!(
        "<h1>{title}</h1><p>{description}</p>{list}",
        title = escape(&group.title),
        description = escape(&group.description),
        list = post_list(page, &format!("/group/{}/", group.slug)),
    );
    layout(&group.title, user, &body)
}

/// Follow-button state on a profile, for authenticated viewers.
pub enum FollowState {
    /// Viewing own profile: no follow controls.
    OwnProfile,
    Following,
    NotFollowing,
}

/// Author profile with their posts.
pub fn profile_page(
    viewer: Option<&User>,
    author_username: &str,
    post_count: i64,
    page: &Page<PostDetail>,
    follow_state: Option<FollowState>,
) -> String {
    let mut body = format!(
        "<h1>{author}</h1><p>{count} posts</p>",
        author = escape(author_username),
        count = post_count,
    );

    match follow_state {
        Some(FollowState::Following) => body.push_str(&format!(
            r#"<form method="post" action="/{}/unfollow/"><button type="submit">Unfollow</button></form>"#,
            escape(author_username)
        )),
        Some(FollowState::NotFollowing) => body.push_str(&format!(
            r#"<form method="post" action="/{}/follow/"><button type="submit">Follow</button></form>"#,
            escape(author_username)
        )),
        Some(FollowState::OwnProfile) | None => {}
    }

    body.push_str(&post_list(page, &format!("/{}/", author_username)));
    layout(author_username, viewer, &body)
}

/// Post detail with comments and the comment form.
pub fn post_detail_page(
    viewer: Option<&User>,
    post: &PostDetail,
    comments: &[CommentDetail],
    comment_errors: &FieldErrors,
    comment_text: &str,
) -> String {
    let mut body = post_card(post);

    if viewer.map(|u| u.id) == Some(post.author_id) {
        body.push_str(&format!(
            r#"<a href="/{}/{}/edit/">Edit</a>"#,
            escape(&post.author_username),
            post.id
        ));
    }

    body.push_str(&format!("<h2>Comments ({})</h2>", comments.len()));
    for comment in comments {
        body.push_str(&format!(
            r#"<div class="comment"><a href="/{author}/">{author}</a> <time>{date}</time><p>{text}</p></div>"#,
            author = escape(&comment.author_username),
            date = comment.created_at.format("%Y-%m-%d %H:%M"),
            text = escape(&comment.text),
        ));
    }

    if viewer.is_some() {
        body.push_str(&format!(
            r#"<form method="post" action="/{author}/{id}/comment/">
{error}<textarea name="text">{text}</textarea>
<button type="submit">Add comment</button>
</form>"#,
            author = escape(&post.author_username),
            id = post.id,
            error = field_error(comment_errors, "text"),
            text = escape(comment_text),
        ));
    } else {
        body.push_str(&format!(
            r#"<p><a href="{}">Log in</a> to comment.</p>"#,
            escape(&crate::error::AppError::login_redirect_target(&format!(
                "/{}/{}/",
                post.author_username, post.id
            )))
        ));
    }

    layout("Post", viewer, &body)
}

/// New-post and edit-post form.
#[allow(clippy::too_many_arguments)]
pub fn post_form_page(
    user: &User,
    groups: &[Group],
    action_path: &str,
    text: &str,
    group_raw: &str,
    errors: &FieldErrors,
    is_edit: bool,
) -> String {
    let title = if is_edit { "Edit post" } else { "New post" };

    let mut options = String::from(r#"<option value="">---------</option>"#);
    for group in groups {
        let selected = if group.id.to_string() == group_raw {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            group.id,
            selected,
            escape(&group.title)
        ));
    }

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}" enctype="multipart/form-data">
{text_error}<label>Text <textarea name="text" required>{text}</textarea></label>
{group_error}<label>Group <select name="group">{options}</select></label>
<label>Image <input type="file" name="image" accept="image/*"></label>
<button type="submit">{submit}</button>
</form>"#,
        title = title,
        action = escape(action_path),
        text_error = field_error(errors, "text"),
        text = escape(text),
        group_error = field_error(errors, "group"),
        options = options,
        submit = if is_edit { "Save" } else { "Publish" },
    );

    layout(title, Some(user), &body)
}

/// Login form. `error` is the bad-credentials message, if any.
pub fn login_page(next: &str, error: Option<&str>, username: &str) -> String {
    let error_html = match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    };

    let body = format!(
        r#"<h1>Log in</h1>
{error_html}<form method="post" action="/auth/login/">
<input type="hidden" name="next" value="{next}">
<label>Username <input type="text" name="username" value="{username}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p><a href="/auth/signup/">Sign up</a></p>"#,
        error_html = error_html,
        next = escape(next),
        username = escape(username),
    );

    layout("Log in", None, &body)
}

/// Signup form.
pub fn signup_page(errors: &FieldErrors, username: &str) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="/auth/signup/">
{username_error}<label>Username <input type="text" name="username" value="{username}" required></label>
{password_error}<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign up</button>
</form>"#,
        username_error = field_error(errors, "username"),
        username = escape(username),
        password_error = field_error(errors, "password"),
    );

    layout("Sign up", None, &body)
}

pub fn about_author_page(user: Option<&User>) -> String {
    let body = "<h1>About the author</h1>\
<p>Quill is maintained by a small team of people who like plain text and \
small tools. This page exists so the footer has somewhere to point.</p>";
    layout("About the author", user, body)
}

pub fn about_tech_page(user: Option<&User>) -> String {
    let body = "<h1>Technology</h1>\
<p>Quill is a single Rust service: actix-web for the HTTP layer, PostgreSQL \
behind sqlx for storage, and server-rendered HTML all the way down.</p>";
    layout("Technology", user, body)
}

/// 404 page, echoing the missing path.
pub fn not_found_page(path: &str) -> String {
    let body = format!(
        "<h1>Page not found</h1><p>Nothing lives at <code>{}</code>.</p>",
        escape(path)
    );
    layout("Page not found", None, &body)
}

/// 500 page. Carries no internal detail.
pub fn server_error_page() -> String {
    layout(
        "Server error",
        None,
        "<h1>Server error</h1><p>Something went wrong on our side. Please try again.</p>",
    )
}

pub fn bad_request_page(message: &str) -> String {
    let body = format!("<h1>Bad request</h1><p>{}</p>", escape(message));
    layout("Bad request", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{Page, Paginator};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_post(text: &str) -> PostDetail {
        PostDetail {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_username: "leo".into(),
            group_id: None,
            group_title: None,
            group_slug: None,
            text: text.into(),
            image_path: None,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("hi")</script>"#),
            "&lt;script&gt;alert(&quot;hi&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b"), "a &amp; b");
    }

    #[test]
    fn post_text_is_escaped_in_listings() {
        let paginator = Paginator::new(10, 1);
        let page = Page::new(vec![sample_post("<b>bold</b>")], 1, &paginator);
        let html = index_page(None, &page);
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn pager_renders_only_when_needed() {
        let one = Paginator::new(10, 5);
        let page = Page::new(vec![sample_post("x")], 1, &one);
        assert!(!index_page(None, &page).contains("class=\"pager\""));

        let two = Paginator::new(10, 15);
        let page = Page::new(vec![sample_post("x")], 1, &two);
        let html = index_page(None, &page);
        assert!(html.contains("page 1 of 2"));
        assert!(html.contains("/?page=2"));
        assert!(!html.contains("previous"));
    }

    #[test]
    fn profile_shows_follow_button_state() {
        let paginator = Paginator::new(10, 0);
        let page = Page::new(vec![], 1, &paginator);

        let html = profile_page(None, "leo", 0, &page, Some(FollowState::NotFollowing));
        assert!(html.contains("/leo/follow/"));

        let html = profile_page(None, "leo", 0, &page, Some(FollowState::Following));
        assert!(html.contains("/leo/unfollow/"));

        let html = profile_page(None, "leo", 0, &page, Some(FollowState::OwnProfile));
        assert!(!html.contains("/leo/follow/"));
        assert!(!html.contains("/leo/unfollow/"));
    }

    #[test]
    fn not_found_page_escapes_path() {
        let html = not_found_page("/<script>/");
        assert!(html.contains("&lt;script&gt;"));
    }
}
