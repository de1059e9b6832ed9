//! GET /docs (interactive API documentation).
//!
//! The page pulls Swagger UI from the jsDelivr CDN, which is why the
//! security-header middleware relaxes `script-src`/`style-src` for exactly
//! this path and no other.

use axum::response::Html;

const DOCS_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>API documentation</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({
      url: "/openapi.json",
      dom_id: "#swagger-ui",
    });
  </script>
</body>
</html>
"##;

pub async fn docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
