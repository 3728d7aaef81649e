//! Output compaction for targets that turn stray whitespace into visible gaps.

/// Drop inter-tag newlines, empty paragraphs and the `data-md-root` markers.
pub fn clean_html(html: &str) -> String {
    let gap_re = regex!(r">\s*\n\s*<");
    let empty_p_re = regex!(r"<p(?:\s[^<>]*)?>\s*</p>");
    let marker_re = regex!(r#"\sdata-md-root="[^"]*""#);

    let html = gap_re.replace_all(html, "><");
    let html = empty_p_re.replace_all(&html, "");
    let html = marker_re.replace_all(&html, "");
    html.replace('\n', " ").trim().to_string()
}
