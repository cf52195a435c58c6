//! Generic tree-flattening sequencer
//!
//! [`TreeFlattener`] interprets a nested JSON structure - at each level
//! either a leaf (an array of values) or an internal node (an object mapping
//! keys to sub-structures) - as a single lazy, depth-first, left-to-right
//! sequence of `(path, leaf element)` tuples. Nesting depth is not
//! hardcoded, so the same walker serves both the 2-level
//! (subject → predicate → terms) and 3-level (graph → subject → predicate →
//! terms) layouts of the RDF/JSON wire format.
//!
//! A scalar reached where a sub-structure was expected is coerced to a
//! single-element leaf; the consumer sees it and can reject it with a
//! precise error.

use serde_json::Value as JsonValue;

struct NodeFrame<'a> {
    entries: Vec<(&'a str, &'a JsonValue)>,
    idx: usize,
}

enum Cursor<'a> {
    Node(NodeFrame<'a>),
    Leaf { items: &'a [JsonValue], idx: usize },
}

fn cursor_for(value: &JsonValue) -> Cursor<'_> {
    match value {
        JsonValue::Object(map) => Cursor::Node(NodeFrame {
            entries: map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            idx: 0,
        }),
        JsonValue::Array(items) => Cursor::Leaf { items, idx: 0 },
        other => Cursor::Leaf {
            items: std::slice::from_ref(other),
            idx: 0,
        },
    }
}

/// Lazy depth-first walker over a nested mapping-of-arrays
///
/// Yields `(path, element)` for every element of every leaf array, exactly
/// once, in document order. The sequence is finite; an empty structure is
/// exhausted immediately. Restart by constructing a new flattener.
pub struct TreeFlattener<'a> {
    cursor: Option<Cursor<'a>>,
    parents: Vec<(NodeFrame<'a>, &'a str)>,
}

impl<'a> TreeFlattener<'a> {
    /// Start a walk at the root of a structure
    pub fn new(root: &'a JsonValue) -> Self {
        Self {
            cursor: Some(cursor_for(root)),
            parents: Vec::new(),
        }
    }

    fn path(&self) -> Vec<&'a str> {
        self.parents.iter().map(|(_, key)| *key).collect()
    }
}

impl<'a> Iterator for TreeFlattener<'a> {
    type Item = (Vec<&'a str>, &'a JsonValue);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cursor.take()? {
                Cursor::Node(mut frame) => {
                    if frame.idx < frame.entries.len() {
                        // Descend into the next key's sub-structure
                        let (key, sub) = frame.entries[frame.idx];
                        frame.idx += 1;
                        self.parents.push((frame, key));
                        self.cursor = Some(cursor_for(sub));
                    } else {
                        // Node exhausted: pop to the parent, or terminate
                        let (parent, _) = self.parents.pop()?;
                        self.cursor = Some(Cursor::Node(parent));
                    }
                }
                Cursor::Leaf { items, idx } => {
                    if idx < items.len() {
                        let item = &items[idx];
                        self.cursor = Some(Cursor::Leaf {
                            items,
                            idx: idx + 1,
                        });
                        return Some((self.path(), item));
                    } else {
                        let (parent, _) = self.parents.pop()?;
                        self.cursor = Some(Cursor::Node(parent));
                    }
                }
            }
        }
    }
}
