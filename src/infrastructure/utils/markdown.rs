use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};

const WORDS_PER_MINUTE: usize = 200;

/// Renders markdown to HTML and strips anything unsafe from the result.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(markdown, options);
    let mut raw_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut raw_html, parser);

    sanitize_html(&raw_html)
}

fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::PassThrough)
        .clean(content)
        .to_string()
}

/// Estimated minutes to read `content`, never less than one.
pub fn reading_time_minutes(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}
