//! Structural repetition: runs of sibling elements with the same tag shape.

use crate::dom::Tree;
use crate::error::Result;
use crate::options::Options;
use crate::result::{CandidateTable, PatternType};

use super::columns::signature;
use super::{repetition_score, slot_table, Detector};

/// Finds consecutive siblings with identical structural signatures.
///
/// A product grid of `<div><h3/><span class="price"/></div>` cards becomes one
/// row per card, one column per slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralRepeatDetector;

impl Detector for StructuralRepeatDetector {
    fn name(&self) -> &'static str {
        "structural_repeat"
    }

    fn pattern_type(&self) -> PatternType {
        PatternType::StructuralRepeat
    }

    fn detect(&self, tree: &Tree, options: &Options) -> Result<Vec<CandidateTable>> {
        let min_group = options.min_group_size.max(1);
        let mut tables = Vec::new();

        for container in tree.elements() {
            let children: Vec<_> = tree.children(container).collect();
            if children.len() < min_group {
                continue;
            }
            let signatures: Vec<Vec<String>> = children
                .iter()
                .map(|&c| signature(tree, c, options.signature_depth))
                .collect();

            let mut start = 0;
            while start < children.len() {
                let mut end = start + 1;
                while end < children.len() && signatures[end] == signatures[start] {
                    end += 1;
                }

                let run = &children[start..end];
                if !signatures[start].is_empty() && run.len() >= min_group {
                    let confidence = repetition_score(run.len());
                    if let Some(table) =
                        slot_table(tree, run, options, PatternType::StructuralRepeat, confidence)
                    {
                        tables.push(table);
                    }
                }
                start = end;
            }
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn detect(html: &str) -> Vec<CandidateTable> {
        let tree = dom::parse(html).expect("tree");
        StructuralRepeatDetector
            .detect(&tree, &Options::default())
            .expect("structural detection")
    }

    #[test]
    fn test_product_cards_become_rows() {
        let tables = detect(
            r#"<div id="grid">
                <div class="card"><h3>Lamp</h3><span class="price">$10</span></div>
                <div class="card"><h3>Desk</h3><span class="price">$120</span></div>
                <div class="card"><h3>Chair</h3><span class="price">$45</span></div>
                <div class="card"><h3>Shelf</h3><span class="price">$80</span></div>
            </div>"#,
        );
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.pattern_type(), PatternType::StructuralRepeat);
        assert_eq!(t.row_count(), 4);
        assert_eq!(t.header(), Some(&["h3".to_string(), "price".to_string()][..]));
        assert_eq!(t.rows()[1], vec!["Desk", "$120"]);
        assert!((t.confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_run_is_broken_by_different_sibling() {
        let tables = detect(
            "<ul>\
             <li><a>a</a><em>1</em></li><li><a>b</a><em>2</em></li>\
             <li><strong>ad</strong></li>\
             <li><a>c</a><em>3</em></li><li><a>d</a><em>4</em></li><li><a>e</a><em>5</em></li>\
             </ul>",
        );
        let rows: Vec<usize> = tables.iter().map(CandidateTable::row_count).collect();
        assert_eq!(rows, vec![2, 3]);
    }

    #[test]
    fn test_text_only_siblings_are_ignored() {
        assert!(detect("<ul><li>a</li><li>b</li><li>c</li></ul>").is_empty());
    }

    #[test]
    fn test_min_group_size_applies() {
        let tree = dom::parse("<div><p><b>x</b></p><p><b>y</b></p></div>").expect("tree");
        let options = Options {
            min_group_size: 3,
            ..Options::default()
        };
        assert!(StructuralRepeatDetector.detect(&tree, &options).expect("detect").is_empty());
    }
}
