use md5::{Digest, Md5};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// 個人頁面的相對路徑，已做 URL 與 HTML 跳脫，可直接放進 href
pub fn user_path_html(relative_url_prefix: &str, publicusername: &str) -> String {
    let path = format!(
        "{}user/{}",
        relative_url_prefix,
        urlencoding::encode(publicusername)
    );
    escape_html(&path)
}

/// `inner_html` must already be escaped.
pub fn user_link_html(relative_url_prefix: &str, publicusername: &str, inner_html: &str) -> String {
    format!(
        r#"<a href="{}" class="qa-user-link">{}</a>"#,
        user_path_html(relative_url_prefix, publicusername),
        inner_html
    )
}

pub fn gravatar_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    format!("{:x}", Md5::digest(normalized.as_bytes()))
}

pub fn gravatar_img_html(base_url: &str, hash: &str, size: u32) -> String {
    format!(
        r#"<img src="{}" width="{size}" height="{size}" class="qa-avatar-image" alt="" />"#,
        escape_html(&format!(
            "{}/{}.jpg?s={}",
            base_url.trim_end_matches('/'),
            hash,
            size
        )),
        size = size
    )
}
