//! Path pattern parsing and matching.

use cascade_core::{CascadeError, CascadeResult, PathParams};

/// A parsed path pattern such as `/users/{id}/posts`.
///
/// Segments are either static text or a `{name}` capture. Matching is a
/// linear segment walk; patterns here are tiny and declared once at
/// startup, so nothing fancier is warranted.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Static(String),
    Param(String),
}

impl Pattern {
    pub(crate) fn parse(raw: &str) -> Self {
        let segments = split(raw)
            .map(|segment| {
                segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                    .map_or_else(
                        || Segment::Static(segment.to_string()),
                        |name| Segment::Param(name.to_string()),
                    )
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    /// Matches a concrete path, extracting parameters on success.
    pub(crate) fn matches(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::new();
        let mut segments = self.segments.iter();
        let mut parts = split(path);

        loop {
            match (segments.next(), parts.next()) {
                (None, None) => return Some(params),
                (Some(Segment::Static(expected)), Some(part)) if expected == part => {}
                (Some(Segment::Param(name)), Some(part)) if !part.is_empty() => {
                    params.insert(name.clone(), part);
                }
                _ => return None,
            }
        }
    }

    /// Fills the pattern with parameter values, producing a concrete path.
    pub(crate) fn fill(&self, params: &PathParams) -> CascadeResult<String> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| {
                        CascadeError::resolution(
                            name.clone(),
                            format!("missing path parameter for pattern `{}`", self.raw),
                        )
                    })?;
                    path.push_str(value);
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
}
