use crate::ConfigurationError;

use super::pattern::{self, Segment};
use super::Params;

#[derive(Debug, Clone)]
pub struct PathTree<P> {
    root: Node<P>,
    /// Registered patterns in character-level prefix tree order.
    order: Vec<String>,
}

#[derive(Debug, Clone)]
struct Node<P> {
    segment: Option<Segment>,
    entry: Option<Entry<P>>,
    children: Vec<Node<P>>,
}

#[derive(Debug, Clone)]
struct Entry<P> {
    pattern: String,
    payload: P,
}

/// A successful lookup.
#[derive(Debug)]
pub struct Match<'a, P> {
    pub pattern: &'a str,
    pub payload: &'a P,
    pub params: Params,
}

impl<P> Default for PathTree<P> {
    fn default() -> Self {
        Self {
            root: Node::new(None),
            order: Vec::new(),
        }
    }
}

impl<P> PathTree<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the payload slot of `pattern`, creating it with `default` on first use.
    pub fn get_or_insert_with(
        &mut self,
        pattern: &str,
        default: impl FnOnce() -> P,
    ) -> Result<&mut P, ConfigurationError> {
        let segments = pattern::compile(pattern)?;
        let Self { root, order } = self;
        let mut node = root;
        for segment in segments {
            let position = match node
                .children
                .iter()
                .position(|child| child.segment.as_ref() == Some(&segment))
            {
                Some(position) => position,
                None => {
                    node.children.push(Node::new(Some(segment)));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[position];
        }
        let entry = node.entry.get_or_insert_with(|| {
            let position = prefix_position(order, pattern);
            order.insert(position, pattern.to_string());
            Entry {
                pattern: pattern.to_string(),
                payload: default(),
            }
        });
        Ok(&mut entry.payload)
    }

    /// Payload registered under exactly `pattern`.
    pub fn get(&self, pattern: &str) -> Option<&P> {
        let sources = pattern::split_segments(pattern.strip_prefix('/')?).ok()?;
        let mut node = &self.root;
        for source in sources {
            node = node.children.iter().find(|child| {
                child
                    .segment
                    .as_ref()
                    .is_some_and(|segment| segment.source() == source)
            })?;
        }
        node.entry.as_ref().map(|entry| &entry.payload)
    }

    /// Resolves a concrete path to the most specific registered pattern.
    pub fn lookup(&self, path: &str) -> Option<Match<'_, P>> {
        let segments = path.strip_prefix('/')?.split('/').collect::<Vec<_>>();
        let mut params = Params::new();
        let entry = self.root.find(&segments, &mut params)?;
        Some(Match {
            pattern: entry.pattern.as_str(),
            payload: &entry.payload,
            params,
        })
    }

    /// Every registered pattern, in the pre-order of a character-level prefix tree over
    /// the patterns: a pattern comes before the patterns it is a prefix of, patterns
    /// sharing a prefix stay together, and insertion order decides the rest.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter {
            tree: self,
            patterns: self.order.iter(),
        }
    }
}

impl<P: Clone> PathTree<P> {
    /// Folds `other` into this tree as if its patterns were inserted in traversal order.
    /// `merge` combines payloads registered under the same pattern on both sides.
    pub fn extend_from(&mut self, other: &PathTree<P>, merge: impl Fn(&mut P, &P)) {
        let added = other
            .order
            .iter()
            .filter(|pattern| self.get(pattern).is_none())
            .cloned()
            .collect::<Vec<_>>();
        self.root.absorb(&other.root, &merge);
        for pattern in added {
            let position = prefix_position(&self.order, &pattern);
            self.order.insert(position, pattern);
        }
    }
}

impl<P> Node<P> {
    fn new(segment: Option<Segment>) -> Self {
        Self {
            segment,
            entry: None,
            children: Vec::new(),
        }
    }

    fn rank(&self) -> u8 {
        self.segment.as_ref().map_or(0, Segment::rank)
    }

    fn find(&self, segments: &[&str], params: &mut Params) -> Option<&Entry<P>> {
        let Some((head, tail)) = segments.split_first() else {
            return self.entry.as_ref();
        };
        for rank in 0..=2 {
            for child in self.children.iter().filter(|child| child.rank() == rank) {
                let Some(segment) = &child.segment else {
                    continue;
                };
                let mark = params.len();
                let found = match segment {
                    Segment::Rest { .. } => {
                        let rest = segments.join("/");
                        segment
                            .matches(&rest, params)
                            .then_some(child.entry.as_ref())
                            .flatten()
                    }
                    _ if segment.matches(head, params) => child.find(tail, params),
                    _ => None,
                };
                if found.is_some() {
                    return found;
                }
                params.truncate(mark);
            }
        }
        None
    }
}

impl<P: Clone> Node<P> {
    fn absorb(&mut self, other: &Node<P>, merge: &impl Fn(&mut P, &P)) {
        if let Some(theirs) = &other.entry {
            match &mut self.entry {
                Some(mine) => merge(&mut mine.payload, &theirs.payload),
                None => self.entry = Some(theirs.clone()),
            }
        }
        for theirs in &other.children {
            let position = match self
                .children
                .iter()
                .position(|child| child.segment == theirs.segment)
            {
                Some(position) => position,
                None => {
                    self.children.push(Node::new(theirs.segment.clone()));
                    self.children.len() - 1
                }
            };
            self.children[position].absorb(theirs, merge);
        }
    }
}

/// Index at which `pattern` joins `order` to keep it in prefix tree pre-order.
///
/// Descends the groups of patterns sharing a prefix with `pattern`. A group whose common
/// prefix diverges from `pattern` is split: `pattern` goes first when it is that shared
/// prefix, after the group otherwise.
fn prefix_position(order: &[String], pattern: &str) -> usize {
    let key = pattern.as_bytes();
    let (mut start, mut end, mut depth) = (0, order.len(), 0);
    loop {
        let Some(&byte) = key.get(depth) else {
            return start;
        };
        let branch = |other: &&String| other.as_bytes().get(depth) == Some(&byte);
        let Some(offset) = order[start..end].iter().position(|other| branch(&other)) else {
            return end;
        };
        let first = start + offset;
        let last = first + order[first..end].iter().take_while(branch).count();
        let edge = order[first + 1..last]
            .iter()
            .fold(order[first].len(), |edge, other| {
                edge.min(common_prefix(&order[first], other))
            });
        let shared = common_prefix(&order[first], pattern);
        if shared < edge {
            return if shared == key.len() { first } else { last };
        }
        (start, end, depth) = (first, last, edge);
    }
}

fn common_prefix(left: &str, right: &str) -> usize {
    left.bytes()
        .zip(right.bytes())
        .take_while(|(left, right)| left == right)
        .count()
}

/// Lazy iterator over `(pattern, payload)` pairs.
pub struct Iter<'a, P> {
    tree: &'a PathTree<P>,
    patterns: std::slice::Iter<'a, String>,
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = (&'a str, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.patterns
            .by_ref()
            .find_map(|pattern| Some((pattern.as_str(), tree.get(pattern)?)))
    }
}
