//! Legacy URL shapes
//!
//! Every historical product-page path is described by a short program of
//! [`PatternOp`]s. The same static table drives the imperative extractor and
//! the declarative rule compiler, so the two can never drift apart.
//!
//! # Matching
//!
//! A program is searched for anywhere in the path (unanchored), left to
//! right. `Lit` is an exact byte match, `Segment` consumes one non-empty run
//! of non-`/` bytes, `Capture` takes exactly ten `[A-Z0-9]` bytes. Bytes after
//! the last op are unconstrained.
//!
//! A `Segment` is always followed by a literal starting with `/`, which makes
//! the greedy run-to-next-slash the only way it can match.

use crate::asin::{Asin, ASIN_LEN};

/// One step of a shape program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOp {
    /// Exact literal bytes
    Lit(&'static str),
    /// One non-empty path segment (title slug), discarded
    Segment,
    /// The identifier
    Capture,
}

/// Stable name of each shape, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeId {
    ExecObidosAsin,
    OAsin,
    ExecObidosIsbnEq,
    ExecObidosIsbnPct,
    OIsbnEq,
    ExecObidosDetail,
    ExecObidosDetailSlug,
    ODetail,
    ODetailSlug,
    GpProduct,
    GpProductDescription,
    SlugDp,
    SlugDpDescription,
    SlugDpTrailing,
    DpFallback,
}

impl ShapeId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExecObidosAsin => "exec-obidos-asin",
            Self::OAsin => "o-asin",
            Self::ExecObidosIsbnEq => "exec-obidos-isbn",
            Self::ExecObidosIsbnPct => "exec-obidos-isbn-pct",
            Self::OIsbnEq => "o-isbn",
            Self::ExecObidosDetail => "exec-obidos-detail",
            Self::ExecObidosDetailSlug => "exec-obidos-detail-slug",
            Self::ODetail => "o-detail",
            Self::ODetailSlug => "o-detail-slug",
            Self::GpProduct => "gp-product",
            Self::GpProductDescription => "gp-product-description",
            Self::SlugDp => "slug-dp",
            Self::SlugDpDescription => "slug-dp-description",
            Self::SlugDpTrailing => "slug-dp-trailing",
            Self::DpFallback => "dp",
        }
    }
}

/// A legacy pattern entry.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub id: ShapeId,
    pub program: &'static [PatternOp],
    /// Emitted as a declarativeNetRequest rule
    pub declarative: bool,
}

use PatternOp::{Capture, Lit, Segment};

/// Legacy shapes in fixed priority order. First match wins.
pub static LEGACY_SHAPES: [Shape; 14] = [
    Shape {
        id: ShapeId::ExecObidosAsin,
        program: &[Lit("/exec/obidos/ASIN/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::OAsin,
        program: &[Lit("/o/ASIN/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ExecObidosIsbnEq,
        program: &[Lit("/exec/obidos/ISBN="), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ExecObidosIsbnPct,
        program: &[Lit("/exec/obidos/ISBN%3D"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::OIsbnEq,
        program: &[Lit("/o/ISBN="), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ExecObidosDetail,
        program: &[Lit("/exec/obidos/tg/detail/-/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ExecObidosDetailSlug,
        program: &[Lit("/exec/obidos/tg/detail/-/"), Segment, Lit("/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ODetail,
        program: &[Lit("/o/tg/detail/-/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::ODetailSlug,
        program: &[Lit("/o/tg/detail/-/"), Segment, Lit("/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::GpProduct,
        program: &[Lit("/gp/product/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::GpProductDescription,
        program: &[Lit("/gp/product/product-description/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::SlugDp,
        program: &[Lit("/"), Segment, Lit("/dp/"), Capture],
        declarative: true,
    },
    Shape {
        id: ShapeId::SlugDpDescription,
        program: &[Lit("/"), Segment, Lit("/dp/product-description/"), Capture],
        declarative: true,
    },
    // Subsumed by SlugDp, kept so the imperative order stays complete.
    Shape {
        id: ShapeId::SlugDpTrailing,
        program: &[Lit("/"), Segment, Lit("/dp/"), Capture, Lit("/")],
        declarative: false,
    },
];

/// Last resort: `/dp/<id>` anywhere in the path.
pub static DP_FALLBACK: Shape = Shape {
    id: ShapeId::DpFallback,
    program: &[Lit("/dp/"), Capture],
    declarative: false,
};

/// Slug used when rendering sample paths.
pub const SAMPLE_SLUG: &str = "Elements-Style";

impl Shape {
    /// Search `path` for this shape and return the captured identifier.
    pub fn find(&self, path: &str) -> Option<Asin> {
        let bytes = path.as_bytes();
        (0..bytes.len()).find_map(|start| match_at(bytes, start, self.program))
    }

    /// Human-readable form, e.g. `/gp/product/<id>`.
    pub fn pattern(&self) -> String {
        self.render("<anything>", "<id>")
    }

    /// A well-formed path of this shape carrying `asin`.
    pub fn sample_path(&self, asin: &Asin) -> String {
        self.render(SAMPLE_SLUG, asin.as_str())
    }

    fn render(&self, slug: &str, id: &str) -> String {
        let mut out = String::new();
        for op in self.program {
            match op {
                Lit(s) => out.push_str(s),
                Segment => out.push_str(slug),
                Capture => out.push_str(id),
            }
        }
        out
    }
}

/// Every shape the extractor tries, fallback last.
pub fn all_shapes() -> impl Iterator<Item = &'static Shape> {
    LEGACY_SHAPES.iter().chain(std::iter::once(&DP_FALLBACK))
}

/// Run `program` anchored at `start`.
#[inline]
fn match_at(bytes: &[u8], start: usize, program: &[PatternOp]) -> Option<Asin> {
    let mut pos = start;
    let mut captured = None;

    for op in program {
        let rest = &bytes[pos..];
        match *op {
            Lit(lit) => {
                if !rest.starts_with(lit.as_bytes()) {
                    return None;
                }
                pos += lit.len();
            }
            Segment => {
                let len = rest.iter().position(|&b| b == b'/').unwrap_or(rest.len());
                if len == 0 {
                    return None;
                }
                pos += len;
            }
            Capture => {
                captured = Some(Asin::from_prefix(rest)?);
                pos += ASIN_LEN;
            }
        }
    }

    captured
}
