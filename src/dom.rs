//! DOM Model
//!
//! Parses markup with `dom_query` (html5ever's tolerant tree builder) and
//! converts the result into an immutable arena of nodes addressed by
//! [`NodeId`]. Nodes are numbered in document pre-order, so the descendants of
//! a node always occupy the contiguous id range right after it. Parent links
//! are plain indices; there are no owning back-references.
//!
//! The arena is `Send + Sync` and is shared read-only by all detectors.

use std::collections::BTreeMap;
use std::ops::Range;

use dom_query::{Document, NodeRef};

use crate::error::{Error, Result};
use crate::patterns::TAG_TOKEN;
use crate::result::NodePath;

/// Subtrees dropped during conversion; they never hold visible data.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line of text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "details", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void elements; they never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to their own end tag.
const RAW_TEXT_TAGS: &[&str] = &[
    "iframe", "noembed", "noframes", "script", "style", "textarea", "title", "xmp",
];

/// Elements whose end tag HTML lets authors omit.
const OPTIONAL_END_TAGS: &[&str] = &[
    "body", "colgroup", "dd", "dt", "head", "html", "li", "optgroup", "option", "p",
    "rp", "rt", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Index of a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in document order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tag name and attributes of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
    depth: usize,
    /// Exclusive end of this node's subtree in the arena.
    end: usize,
    path: NodePath,
}

/// One line of text inside a container, with the node it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Whitespace-normalized text.
    pub text: String,
    /// The block child that produced the line, or the container itself for
    /// runs of text and inline markup.
    pub node: NodeId,
}

/// Immutable parsed document.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

// === Parsing ===

/// Parse markup into a [`Tree`] rooted at the `<html>` element.
///
/// Malformed markup is repaired by the html5ever tree builder (implicit
/// closing, foster parenting, unknown tags kept as generic containers) and
/// never fails. Fails with [`Error::EmptyDocument`] only when the input is
/// blank or holds neither text nor any element beyond the html/head/body
/// skeleton.
///
/// # Example
///
/// ```rust
/// use rs_tablescout::dom;
///
/// let tree = dom::parse("<ul><li>one<li>two</ul>")?;
/// let items: Vec<_> = tree.elements().filter(|&id| tree.tag(id) == "li").collect();
/// assert_eq!(items.len(), 2);
/// assert_eq!(tree.path(items[1]).as_str(), "/html[1]/body[1]/ul[1]/li[2]");
/// # Ok::<(), rs_tablescout::Error>(())
/// ```
pub fn parse(markup: &str) -> Result<Tree> {
    if markup.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }

    let document = Document::from(markup);
    let tree = Tree::from_document(&document);

    if tree.has_content() {
        Ok(tree)
    } else {
        Err(Error::EmptyDocument)
    }
}

/// Count tags in raw markup that needed recovery.
///
/// Best-effort signal: the number of non-void start tags without a matching
/// end tag plus stray end tags, ignoring elements whose end tag is optional.
/// The bodies of raw-text elements such as `<script>` are not scanned.
/// Zero means the markup looked balanced.
#[must_use]
pub fn markup_recovery_signal(markup: &str) -> usize {
    let lower = markup.to_ascii_lowercase();
    let mut open: BTreeMap<String, i64> = BTreeMap::new();
    let mut stray = 0_usize;
    let mut pos = 0;

    while let Some(caps) = TAG_TOKEN.captures_at(markup, pos) {
        let Some(token) = caps.get(0) else { break };
        pos = token.end();

        let tag = caps[2].to_ascii_lowercase();
        if VOID_TAGS.contains(&tag.as_str()) || OPTIONAL_END_TAGS.contains(&tag.as_str()) {
            continue;
        }
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();

        if !closing && !self_closing && RAW_TEXT_TAGS.contains(&tag.as_str()) {
            match raw_text_end(&lower, pos, &tag) {
                Some(end) => {
                    pos = end;
                    continue;
                }
                None => {
                    // The body runs to the end of the input.
                    *open.entry(tag).or_insert(0) += 1;
                    break;
                }
            }
        }

        let count = open.entry(tag).or_insert(0);
        if closing {
            if *count > 0 {
                *count -= 1;
            } else {
                stray += 1;
            }
        } else if !self_closing {
            *count += 1;
        }
    }

    let unclosed: i64 = open.values().sum();
    stray + usize::try_from(unclosed).unwrap_or(0)
}

/// Byte offset just past the `</tag>` that closes a raw-text body starting at
/// `from`. `lower` is the lowercased markup.
fn raw_text_end(lower: &str, from: usize, tag: &str) -> Option<usize> {
    let end_tag = format!("</{tag}");
    let mut search = from;
    loop {
        let start = search + lower[search..].find(&end_tag)?;
        let after = start + end_tag.len();
        match lower.as_bytes().get(after) {
            Some(b'>' | b'/') | None => {}
            Some(b) if b.is_ascii_whitespace() => {}
            // `</scripts` does not close `<script>`.
            Some(_) => {
                search = after;
                continue;
            }
        }
        return Some(lower[after..].find('>').map_or(lower.len(), |gt| after + gt + 1));
    }
}

impl Tree {
    fn from_document(document: &Document) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        let root = document.root();

        let html = root
            .children()
            .into_iter()
            .find(|child| child.is_element() && child.node_name().is_some_and(|n| n.eq_ignore_ascii_case("html")));

        let root_id = tree.push_element(None, "html".to_string(), Vec::new(), 1);
        let mut stack: Vec<(NodeRef<'_>, NodeId)> = Vec::new();
        // Elements pushed so far per parent and tag, for `[n]` path steps.
        let mut sibling_index: BTreeMap<(NodeId, String), usize> = BTreeMap::new();
        let top_level = match html {
            Some(html) => {
                tree.set_attrs(root_id, &html);
                html.children()
            }
            None => root.children(),
        };
        for child in top_level.into_iter().rev() {
            stack.push((child, root_id));
        }

        while let Some((node, parent)) = stack.pop() {
            if node.is_element() {
                let tag = node
                    .node_name()
                    .map(|name| name.to_ascii_lowercase())
                    .unwrap_or_default();
                if tag.is_empty() || SKIPPED_TAGS.contains(&tag.as_str()) {
                    continue;
                }
                let attrs = node
                    .attrs()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let index = sibling_index.entry((parent, tag.clone())).or_insert(0);
                *index += 1;
                let id = tree.push_element(Some(parent), tag, attrs, *index);
                for child in node.children().into_iter().rev() {
                    stack.push((child, id));
                }
            } else if node.is_text() {
                tree.push_text(parent, node.text().to_string());
            }
        }

        tree.finalize();
        tree
    }

    fn set_attrs(&mut self, id: NodeId, node: &NodeRef<'_>) {
        if let NodeData::Element(el) = &mut self.nodes[id.0].data {
            el.attrs = node
                .attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
        }
    }

    /// `index` is the 1-based position among same-tag siblings.
    fn push_element(
        &mut self,
        parent: Option<NodeId>,
        tag: String,
        attrs: Vec<(String, String)>,
        index: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (depth, path) = match parent {
            Some(p) => (self.nodes[p.0].depth + 1, self.nodes[p.0].path.child(&tag, index)),
            None => (0, NodePath::new(format!("/{tag}[{index}]"))),
        };
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data: NodeData::Element(Element { tag, attrs }),
            depth,
            end: id.0 + 1,
            path,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn push_text(&mut self, parent: NodeId, text: String) {
        let id = NodeId(self.nodes.len());
        let path = self.nodes[parent.0].path.clone();
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data: NodeData::Text(text),
            depth: self.nodes[parent.0].depth + 1,
            end: id.0 + 1,
            path,
        });
        self.nodes[parent.0].children.push(id);
    }

    /// Compute subtree ranges bottom-up.
    fn finalize(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let end = self.nodes[i]
                .children
                .last()
                .map_or(i + 1, |last| self.nodes[last.0].end);
            self.nodes[i].end = end;
        }
    }

    fn has_content(&self) -> bool {
        self.nodes.iter().any(|node| match &node.data {
            NodeData::Text(text) => !text.trim().is_empty(),
            NodeData::Element(el) => !matches!(el.tag.as_str(), "html" | "body"),
        })
    }

    // === Node Information ===

    /// The `<html>` root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The `<body>` element, or the root when there is none.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.children(self.root())
            .find(|&c| self.tag(c) == "body")
            .unwrap_or_else(|| self.root())
    }

    /// Number of nodes (elements and text).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a parsed tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Element data, `None` for text nodes.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Tag name (lowercase), empty for text nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        self.element(id).map_or("", |el| el.tag.as_str())
    }

    /// Any attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Class tokens, sorted and deduplicated.
    #[must_use]
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        let mut classes: Vec<&str> = self
            .attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Raw text of a text node.
    #[must_use]
    pub fn raw_text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element(_) => None,
        }
    }

    /// Structural path (text nodes report their parent's path).
    #[must_use]
    pub fn path(&self, id: NodeId) -> &NodePath {
        &self.nodes[id.0].path
    }

    /// Distance from the root.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// Depth of the deepest node.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    // === Tree Navigation ===

    /// Parent node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// All child nodes, text included, in order.
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element children in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// Id range of all descendants, text included.
    #[must_use]
    pub fn descendant_range(&self, id: NodeId) -> Range<usize> {
        id.0 + 1..self.nodes[id.0].end
    }

    /// Element descendants in document order.
    pub fn element_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendant_range(id)
            .map(NodeId)
            .filter(|&d| self.is_element(d))
    }

    /// Number of element descendants.
    #[must_use]
    pub fn descendant_element_count(&self, id: NodeId) -> usize {
        self.element_descendants(id).count()
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId).filter(|&id| self.is_element(id))
    }

    /// Nearest strict ancestor satisfying `pred`.
    pub fn nearest_ancestor(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if pred(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.descendant_range(ancestor).contains(&node.0)
    }

    // === Text Content ===

    /// All descendant text, whitespace-normalized.
    ///
    /// Block-level elements and `<br>` separate words, inline markup does not:
    /// `<p>a</p><p>b</p>` gives `a b`, `<b>Hel</b>lo` gives `Hello`.
    #[must_use]
    pub fn text(&self, id: NodeId) -> String {
        normalize_whitespace(&self.flatten(id, ' '))
    }

    /// Text of the node's own text children only.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        let joined: Vec<&str> = self
            .child_nodes(id)
            .iter()
            .filter_map(|&c| self.raw_text(c))
            .collect();
        normalize_whitespace(&joined.join(" "))
    }

    /// Descendant text split into lines at block boundaries and `<br>`.
    #[must_use]
    pub fn lines(&self, id: NodeId) -> Vec<String> {
        self.flatten(id, '\n')
            .split('\n')
            .map(normalize_whitespace)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Lines made by the direct children of a container.
    ///
    /// Each block child becomes one line attributed to that child. Text and
    /// inline children between blocks (or `<br>`s) merge into one line,
    /// attributed to the single inline element when there is exactly one and
    /// no loose text, otherwise to the container.
    #[must_use]
    pub fn child_lines(&self, id: NodeId) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut buffer = String::new();
        let mut run: Vec<NodeId> = Vec::new();
        let mut loose_text = false;

        let flush = |buffer: &mut String, run: &mut Vec<NodeId>, loose_text: &mut bool, lines: &mut Vec<Line>| {
            let text = normalize_whitespace(buffer);
            if !text.is_empty() {
                let node = if run.len() == 1 && !*loose_text { run[0] } else { id };
                lines.push(Line { text, node });
            }
            buffer.clear();
            run.clear();
            *loose_text = false;
        };

        for &child in self.child_nodes(id) {
            if let Some(text) = self.raw_text(child) {
                buffer.push_str(text);
                if !text.trim().is_empty() {
                    loose_text = true;
                }
                continue;
            }

            let tag = self.tag(child);
            if tag == "br" {
                flush(&mut buffer, &mut run, &mut loose_text, &mut lines);
            } else if BLOCK_TAGS.contains(&tag) {
                flush(&mut buffer, &mut run, &mut loose_text, &mut lines);
                let text = self.text(child);
                if !text.is_empty() {
                    lines.push(Line { text, node: child });
                }
            } else {
                buffer.push_str(&self.flatten(child, ' '));
                run.push(child);
            }
        }
        flush(&mut buffer, &mut run, &mut loose_text, &mut lines);

        lines
    }

    /// Concatenate descendant text, emitting `separator` around block
    /// elements. Iterative so arbitrarily deep trees are safe.
    fn flatten(&self, id: NodeId, separator: char) -> String {
        enum Visit {
            Enter(NodeId),
            Exit,
        }

        let mut out = String::new();
        let mut stack = vec![Visit::Enter(id)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Exit => out.push(separator),
                Visit::Enter(node) => match &self.nodes[node.0].data {
                    NodeData::Text(text) => {
                        out.extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
                    }
                    NodeData::Element(el) => {
                        if BLOCK_TAGS.contains(&el.tag.as_str()) {
                            out.push(separator);
                            stack.push(Visit::Exit);
                        }
                        for &child in self.nodes[node.0].children.iter().rev() {
                            stack.push(Visit::Enter(child));
                        }
                    }
                },
            }
        }

        out
    }
}

/// Collapse whitespace runs (including non-breaking spaces) and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `tag` starts a new line of text.
#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}
