//! Server-rendered HTML pages

use std::fmt::Write;

use gallery_core::MediaRecord;

const STYLESHEET: &str = "/static/gallery.css";
const SCRIPT: &str = "/static/gallery.js";

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
<header>
<h1>Personal Media Gallery</h1>
<nav><a href="/">Gallery</a> <a href="/upload">Upload</a></nav>
</header>
<main>
{body}
</main>
<script src="{SCRIPT}"></script>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn banner(class: &str, message: Option<&str>) -> String {
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => format!(
            r#"<div class="banner {}" role="status">{}</div>"#,
            class,
            escape(message)
        ),
        None => String::new(),
    }
}

fn media_card(record: &MediaRecord) -> String {
    let preview = if record.is_video() {
        format!(
            r#"<video controls preload="metadata" src="{}"></video>"#,
            escape(&record.url)
        )
    } else {
        format!(
            r#"<a href="{full}" target="_blank" rel="noopener"><img loading="lazy" src="{thumb}" srcset="{thumb} 300w, {medium} 800w" sizes="(max-width: 600px) 100vw, 300px" alt="{alt}"></a>"#,
            full = escape(&record.full_url),
            thumb = escape(&record.thumbnail_url),
            medium = escape(&record.medium_url),
            alt = escape(&record.original_name),
        )
    };

    format!(
        r#"<figure class="media-item" data-external-id="{id}">
{preview}
<figcaption>
<span class="name">{name}</span>
<time datetime="{iso}">{shown}</time>
<button type="button" class="delete" data-external-id="{id}">Delete</button>
</figcaption>
</figure>"#,
        id = escape(&record.external_id),
        name = escape(&record.original_name),
        iso = record.uploaded_at.to_rfc3339(),
        shown = record.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Gallery page: newest first, optional success banner.
pub fn gallery_page(media: &[MediaRecord], success: Option<&str>) -> String {
    let mut body = banner("success", success);

    if media.is_empty() {
        body.push_str(r#"<p class="empty">No media yet. <a href="/upload">Upload some</a>.</p>"#);
    } else {
        body.push_str(r#"<section class="gallery">"#);
        for record in media {
            // Writing into a String cannot fail.
            let _ = write!(body, "\n{}", media_card(record));
        }
        body.push_str("\n</section>");
    }

    layout("Gallery", &body)
}

/// Upload form, optionally carrying an error from the previous attempt.
pub fn upload_page(error: Option<&str>, max_files: usize, max_file_size_mb: usize) -> String {
    let mut body = banner("error", error);
    let _ = write!(
        body,
        r#"
<form action="/upload" method="post" enctype="multipart/form-data">
<label for="media">Choose up to {max_files} images or videos (jpg, png, mp4, {max_file_size_mb} MB each)</label>
<input id="media" type="file" name="media" accept="image/jpeg,image/png,video/mp4" multiple required>
<button type="submit">Upload</button>
</form>"#
    );

    layout("Upload", &body)
}
