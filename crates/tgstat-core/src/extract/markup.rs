// HTML back end for label lookups.
//
// The modals render each field as
//
//   <div class="control-group">
//     <label class="control-label">Line Rate</label>
//     <div class="controls"><span class="simple-desc">... 4.85 Mbps ... 12.30 Mbps</span></div>
//   </div>
//
// The label's text node sits inside the label element (the container),
// whose parent is the region holding every value for that field.

use scraper::{ElementRef, Html};

use super::LabelSource;

/// A parsed page.
pub struct MarkupDocument {
    html: Html,
}

impl MarkupDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Element whose own text is exactly `label`. A `<label>` wins over
    /// headings or legends carrying the same words.
    fn label_element(&self, label: &str) -> Option<ElementRef<'_>> {
        let mut fallback = None;
        for node in self.html.tree.root().descendants() {
            if !node.value().as_text().is_some_and(|t| collapse(t) == label) {
                continue;
            }
            let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if parent.value().name() == "label" {
                return Some(parent);
            }
            fallback.get_or_insert(parent);
        }
        fallback
    }
}

impl std::fmt::Debug for MarkupDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkupDocument").finish_non_exhaustive()
    }
}

impl LabelSource for MarkupDocument {
    fn value_after(&self, label: &str) -> Option<String> {
        let container = self.label_element(label)?;
        let container_end = container.descendants().last()?.id();

        // First span or non-blank text after the container, in document order.
        self.html
            .tree
            .root()
            .descendants()
            .skip_while(|n| n.id() != container_end)
            .skip(1)
            .find_map(|n| {
                if let Some(el) = ElementRef::wrap(n) {
                    return (el.value().name() == "span").then(|| element_text(el));
                }
                let text = collapse(n.value().as_text()?);
                (!text.is_empty()).then_some(text)
            })
    }

    fn region_text(&self, label: &str) -> Option<String> {
        let container = self.label_element(label)?;
        let region = container
            .parent()
            .and_then(ElementRef::wrap)
            .unwrap_or(container);
        Some(element_text(region))
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse(&el.text().collect::<Vec<_>>().join(" "))
}

/// Trim and squeeze runs of whitespace (including `&nbsp;`) to one space.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PAGE: &str = r#"
        <div class="control-group">
          <label class="control-label">DSL Status</label>
          <div class="controls"><span class="simple-desc">Up</span></div>
        </div>
        <div class="control-group">
          <label class="control-label">Line Rate</label>
          <div class="controls">
            <span class="simple-desc"><i class="icon-upload"></i>&nbsp;4.85&nbsp;Mbps
            <i class="icon-download"></i>&nbsp;12.30&nbsp;Mbps</span>
          </div>
        </div>
        <div class="control-group">
          <label class="control-label">DSL Mode</label>
          <div class="controls">VDSL2</div>
        </div>
    "#;

    #[test]
    fn value_after_reads_following_span() {
        let doc = MarkupDocument::parse(PAGE);
        assert_eq!(doc.value_after("DSL Status").as_deref(), Some("Up"));
    }

    #[test]
    fn value_after_falls_back_to_bare_text() {
        let doc = MarkupDocument::parse(PAGE);
        assert_eq!(doc.value_after("DSL Mode").as_deref(), Some("VDSL2"));
    }

    #[test]
    fn region_text_covers_the_whole_group() {
        let doc = MarkupDocument::parse(PAGE);
        assert_eq!(
            doc.region_text("Line Rate").as_deref(),
            Some("Line Rate 4.85 Mbps 12.30 Mbps")
        );
    }

    #[test]
    fn unknown_label_is_none() {
        let doc = MarkupDocument::parse(PAGE);
        assert_eq!(doc.value_after("Serial Number"), None);
        assert_eq!(doc.region_text("Serial Number"), None);
    }

    #[test]
    fn label_element_beats_legend() {
        let doc = MarkupDocument::parse(&format!("<legend>DSL Status</legend>{PAGE}"));
        assert_eq!(doc.value_after("DSL Status").as_deref(), Some("Up"));
    }

    #[test]
    fn non_label_container_is_a_fallback() {
        let doc = MarkupDocument::parse("<p><b>Uptime</b> <em>3min</em></p>");
        assert_eq!(doc.value_after("Uptime").as_deref(), Some("3min"));
        assert_eq!(doc.region_text("Uptime").as_deref(), Some("Uptime 3min"));
    }

    #[test]
    fn label_must_match_whole_text() {
        let doc = MarkupDocument::parse(PAGE);
        assert_eq!(doc.value_after("DSL"), None);
        assert_eq!(doc.value_after("Status"), None);
    }
}
