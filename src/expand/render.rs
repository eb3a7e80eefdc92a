use crate::error::ExpandError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// `[...]`, text is kept
    Keep,
    /// `{...}`, text is dropped unless recalled with `$N`
    Discard,
}

impl GroupKind {
    pub fn opener(self) -> char {
        match self {
            GroupKind::Keep => '[',
            GroupKind::Discard => '{',
        }
    }

    pub fn closer(self) -> char {
        match self {
            GroupKind::Keep => ']',
            GroupKind::Discard => '}',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Text(String),
    Open(GroupKind),
    Close,
}

/// One name while it is being built up. Group boundaries are kept so that
/// discard groups and backreferences can be resolved once the name is
/// complete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion(Vec<Piece>);

impl Expansion {
    pub fn text(s: &str) -> Self {
        let mut e = Self::default();
        e.push_text(s);
        e
    }

    pub fn open(kind: GroupKind) -> Self {
        Self(vec![Piece::Open(kind)])
    }

    pub fn close() -> Self {
        Self(vec![Piece::Close])
    }

    fn push_text(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        match self.0.last_mut() {
            Some(Piece::Text(t)) => t.push_str(s),
            _ => self.0.push(Piece::Text(s.to_owned())),
        }
    }

    /// All text, group structure ignored
    pub fn plain(&self) -> String {
        self.0
            .iter()
            .filter_map(|p| match p {
                Piece::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Produce the final name: text inside discard groups is dropped, then
    /// `$1`..`$9` are replaced by the text of the Nth group opened.
    pub fn render(&self, substitute: bool, name: &str) -> Result<String, ExpandError> {
        let mut visible = String::new();
        let mut groups: Vec<String> = Vec::new();
        let mut open: Vec<(usize, GroupKind)> = Vec::new();

        for piece in &self.0 {
            match piece {
                Piece::Open(kind) => {
                    open.push((groups.len(), *kind));
                    groups.push(String::new());
                }
                Piece::Close => {
                    open.pop();
                }
                Piece::Text(t) => {
                    for (idx, _) in &open {
                        groups[*idx].push_str(t);
                    }
                    if !open.iter().any(|(_, kind)| *kind == GroupKind::Discard) {
                        visible.push_str(t);
                    }
                }
            }
        }

        if substitute {
            visible = substitute_groups(&visible, &groups, name)?;
        }
        Ok(visible)
    }
}

/// Concatenation, as needed by [`outer_join`]
pub trait Concat: Clone {
    fn concat(&mut self, other: &Self);
}

impl Concat for String {
    fn concat(&mut self, other: &Self) {
        self.push_str(other);
    }
}

impl Concat for Expansion {
    fn concat(&mut self, other: &Self) {
        for piece in &other.0 {
            match piece {
                Piece::Text(t) => self.push_text(t),
                p => self.0.push(p.clone()),
            }
        }
    }
}

/// Join a list of lists in outer product fashion.
///
/// `outer_join(&[["1", "2"], ["a", "b"]], "-", "<", ">")` gives
/// `<1-a>`, `<1-b>`, `<2-a>`, `<2-b>`. The first list varies slowest.
pub fn outer_join<T: Concat>(lists: &[Vec<T>], delim: &T, prefix: &T, suffix: &T) -> Vec<T> {
    let mut joined = vec![prefix.clone()];
    for (i, list) in lists.iter().enumerate() {
        joined = joined
            .iter()
            .flat_map(|head| {
                list.iter().map(move |item| {
                    let mut s = head.clone();
                    if i > 0 {
                        s.concat(delim);
                    }
                    s.concat(item);
                    s
                })
            })
            .collect();
    }
    for s in joined.iter_mut() {
        s.concat(suffix);
    }
    joined
}

/// True if the name contains a backreference `$1`..`$9`
pub fn has_backreferences(name: &str) -> bool {
    name.as_bytes()
        .windows(2)
        .any(|w| w[0] == b'$' && (b'1'..=b'9').contains(&w[1]))
}

fn substitute_groups(text: &str, groups: &[String], name: &str) -> Result<String, ExpandError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let digit = chars
            .peek()
            .and_then(|d| d.to_digit(10))
            .filter(|d| *d > 0);
        match (ch, digit) {
            ('$', Some(index)) => {
                chars.next();
                let index = index as usize;
                let group = groups.get(index - 1).ok_or(ExpandError::UnknownGroup {
                    index,
                    groups: groups.len(),
                    name: name.to_owned(),
                })?;
                out.push_str(group);
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn outer_join_multiplies_out() {
        let lists = vec![strings(&["1", "2"]), strings(&["a", "b"])];
        let joined = outer_join(&lists, &"-".into(), &"<".into(), &">".into());
        assert_eq!(joined, strings(&["<1-a>", "<1-b>", "<2-a>", "<2-b>"]));
    }

    #[test]
    fn outer_join_with_an_empty_list_is_empty() {
        let lists = vec![strings(&["1", "2"]), vec![]];
        let joined = outer_join(&lists, &String::new(), &String::new(), &String::new());
        assert!(joined.is_empty());
    }

    #[test]
    fn render_drops_discard_groups() {
        let mut e = Expansion::text("A");
        e.concat(&Expansion::open(GroupKind::Discard));
        e.concat(&Expansion::text("1"));
        e.concat(&Expansion::close());
        e.concat(&Expansion::text("B"));
        assert_eq!(e.render(false, "A{1}B").unwrap(), "AB");
        assert_eq!(e.plain(), "A1B");
    }

    #[test]
    fn render_substitutes_nested_groups() {
        // X[a{b}c]$1$2
        let mut e = Expansion::text("X");
        e.concat(&Expansion::open(GroupKind::Keep));
        e.concat(&Expansion::text("a"));
        e.concat(&Expansion::open(GroupKind::Discard));
        e.concat(&Expansion::text("b"));
        e.concat(&Expansion::close());
        e.concat(&Expansion::text("c"));
        e.concat(&Expansion::close());
        e.concat(&Expansion::text("_$1_$2"));
        assert_eq!(e.render(true, "").unwrap(), "Xac_abc_b");
    }

    #[test]
    fn render_rejects_missing_group() {
        let e = Expansion::text("A$2");
        let err = e.render(true, "A$2").unwrap_err();
        assert_eq!(
            err,
            ExpandError::UnknownGroup {
                index: 2,
                groups: 0,
                name: "A$2".into()
            }
        );
    }

    #[test]
    fn detects_backreferences() {
        assert!(has_backreferences("P{1:3}$1"));
        assert!(!has_backreferences("P$0"));
        assert!(!has_backreferences("$"));
    }
}
