use crate::models::StartupError;

/// Canonical github-markdown-css location, fetched once at startup.
const STYLE_URL: &str =
    "https://raw.githubusercontent.com/sindresorhus/github-markdown-css/gh-pages/github-markdown.css";

/// Fetch the stylesheet embedded into every served page. Failure here is
/// fatal: the server never comes up without it.
pub async fn fetch_style() -> Result<String, StartupError> {
    let response = reqwest::get(STYLE_URL).await?.error_for_status()?;
    Ok(response.text().await?)
}

/// HTML shell served for document paths. The embedded script opens the
/// live-update socket for the same path and swaps in each pushed fragment.
const PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <script>
            var path = location.pathname === "/" ? "" : location.pathname;
            var sock = new WebSocket("ws://" + location.host + "/sock" + path);
            sock.onmessage = function (e) {
                document.getElementById("mdview-container").innerHTML = e.data;
            };
        </script>
        <style>{style}</style>
    </head>
    <body>
        <div id="mdview-container"></div>
    </body>
</html>
"#;

pub fn page(style: &str) -> String {
    PAGE.replace("{style}", style)
}
