use scraper::node::{Comment, Node};
use scraper::{Html, Selector};

use crate::error::{ChartError, Result};

// stands in for the chart in the serialized tree until the svg text is spliced in
const CHART_SLOT: &str = "sweep-charts:chart-slot";

/// A minimal host page with an empty container for one chart.
pub fn default_host_page(title: &str, container_id: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <div id=\"{container_id}\"></div>\n\
         </body>\n\
         </html>\n"
    )
}

/// Insert `fragment` as the last child of the element whose id is
/// `container_id`. The page is parsed as an HTML document, so text and
/// comments that merely mention the id or a closing tag are left alone.
pub fn attach_to_container(page: &str, container_id: &str, fragment: &str) -> Result<String> {
    let missing = || ChartError::MissingContainer(container_id.to_string());

    let escaped = container_id.replace('\\', "\\\\").replace('"', "\\\"");
    let selector = Selector::parse(&format!("[id=\"{}\"]", escaped)).map_err(|_| missing())?;

    let mut document = Html::parse_document(page);
    let container = document
        .select(&selector)
        .next()
        .map(|element| element.id())
        .ok_or_else(missing)?;

    let slot = format!("<!--{}-->", CHART_SLOT);
    let mut node = document.tree.get_mut(container).ok_or_else(missing)?;
    node.append(Node::Comment(Comment { comment: CHART_SLOT.into() }));

    Ok(document.html().replacen(&slot, fragment, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaches_into_default_page() {
        let page = default_host_page("c1 sweep", "chart-container");
        let out = attach_to_container(&page, "chart-container", "<svg></svg>").unwrap();
        assert!(out.contains("<div id=\"chart-container\"><svg></svg></div>"));
        assert!(out.contains("<title>c1 sweep</title>"));
    }

    #[test]
    fn appends_after_existing_children() {
        let page = r#"<body><div id='chart-container'><p>intro</p><div>note</div></div><div>footer</div></body>"#;
        let out = attach_to_container(page, "chart-container", "<svg/>").unwrap();
        assert!(out.contains(
            r#"<div id="chart-container"><p>intro</p><div>note</div><svg/></div><div>footer</div>"#
        ));
    }

    #[test]
    fn id_mentioned_in_text_is_not_the_container() {
        let page = r#"<body><p>The chart goes in the element with id="chart-container" below.</p><div id="chart-container"></div></body>"#;
        let out = attach_to_container(page, "chart-container", "<svg/>").unwrap();
        assert!(out.contains(r#"with id="chart-container" below.</p>"#));
        assert!(out.contains(r#"<div id="chart-container"><svg/></div>"#));
    }

    #[test]
    fn closing_tag_inside_comment_is_ignored() {
        let page = r#"<body><div id="chart-container"><!-- legacy </div> --></div></body>"#;
        let out = attach_to_container(page, "chart-container", "<svg/>").unwrap();
        assert!(out.contains(r#"<div id="chart-container"><!-- legacy </div> --><svg/></div>"#));
    }

    #[test]
    fn missing_container_is_an_error() {
        let page = r#"<body><div data-id="chart-container"></div></body>"#;
        let err = attach_to_container(page, "chart-container", "<svg/>").unwrap_err();
        assert!(matches!(err, ChartError::MissingContainer(ref id) if id == "chart-container"));

        let page = r#"<body><p>see id="chart-container"</p></body>"#;
        let err = attach_to_container(page, "chart-container", "<svg/>").unwrap_err();
        assert!(matches!(err, ChartError::MissingContainer(_)));
    }
}
