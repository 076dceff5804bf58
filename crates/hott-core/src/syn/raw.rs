//! Named syntax, as produced by the parser and consumed by the resolver.

use std::fmt::{self, Display, Formatter};

pub type BoxRaw = Box<Raw>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Raw {
    Universe(usize),
    /// A reference to a bound variable or a global.
    Name(String),
    Metavariable(usize),
    Pi {
        name: String,
        source: BoxRaw,
        target: BoxRaw,
    },
    Arrow {
        source: BoxRaw,
        target: BoxRaw,
    },
    Lambda {
        name: String,
        annotation: Option<BoxRaw>,
        body: BoxRaw,
    },
    Application {
        function: BoxRaw,
        arguments: Vec<Raw>,
    },
    Sigma {
        name: String,
        first: BoxRaw,
        second: BoxRaw,
    },
    Pair {
        first: BoxRaw,
        second: BoxRaw,
    },
    Fst(BoxRaw),
    Snd(BoxRaw),
    Let {
        name: String,
        annotation: Option<BoxRaw>,
        value: BoxRaw,
        body: BoxRaw,
    },
    Id {
        ty: BoxRaw,
        lhs: BoxRaw,
        rhs: BoxRaw,
    },
    Refl {
        ty: BoxRaw,
        point: BoxRaw,
    },
    J {
        ty: BoxRaw,
        motive: BoxRaw,
        base: BoxRaw,
        lhs: BoxRaw,
        rhs: BoxRaw,
        proof: BoxRaw,
    },
    #[cfg(feature = "cubical")]
    Cubical(RawCubical),
}

#[cfg(feature = "cubical")]
pub use cubical::*;

#[cfg(feature = "cubical")]
mod cubical {
    use super::BoxRaw;

    /// An interval term.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum RawDim {
        Zero,
        One,
        Name(String),
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum RawFace {
        Top,
        Bot,
        Eq(String, bool),
        And(Box<RawFace>, Box<RawFace>),
        Or(Box<RawFace>, Box<RawFace>),
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RawBranch {
        pub face: RawFace,
        pub term: super::Raw,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RawGlueBranch {
        pub face: RawFace,
        pub fiber: super::Raw,
        pub equiv: super::Raw,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum RawCubical {
        Interval,
        Dim(RawDim),
        Path {
            ty: BoxRaw,
            lhs: BoxRaw,
            rhs: BoxRaw,
        },
        PathP {
            name: String,
            family: BoxRaw,
            lhs: BoxRaw,
            rhs: BoxRaw,
        },
        PathLambda {
            name: String,
            body: BoxRaw,
        },
        PathApplication {
            path: BoxRaw,
            dimension: RawDim,
        },
        Transport {
            name: String,
            family: BoxRaw,
            base: BoxRaw,
        },
        Partial {
            face: RawFace,
            ty: BoxRaw,
        },
        System(Vec<RawBranch>),
        Comp {
            name: String,
            family: BoxRaw,
            face: RawFace,
            tube: BoxRaw,
            base: BoxRaw,
        },
        HComp {
            ty: BoxRaw,
            face: RawFace,
            name: String,
            tube: BoxRaw,
            base: BoxRaw,
        },
        Fill {
            name: String,
            family: BoxRaw,
            face: RawFace,
            tube: BoxRaw,
            base: BoxRaw,
        },
        Glue {
            ty: BoxRaw,
            branches: Vec<RawGlueBranch>,
        },
        GlueElem {
            base: BoxRaw,
            branches: Vec<RawBranch>,
        },
        Unglue {
            ty: BoxRaw,
            glued: BoxRaw,
        },
        Ua {
            lhs: BoxRaw,
            rhs: BoxRaw,
            equiv: BoxRaw,
        },
        UaBeta {
            equiv: BoxRaw,
            argument: BoxRaw,
        },
        Hit {
            hit: String,
            constructor: String,
            arguments: Vec<super::Raw>,
            dimensions: Vec<RawDim>,
        },
    }
}

impl Raw {
    pub fn name(name: impl Into<String>) -> Raw {
        Raw::Name(name.into())
    }

    pub fn lambda(name: impl Into<String>, body: Raw) -> Raw {
        Raw::Lambda {
            name: name.into(),
            annotation: None,
            body: Box::new(body),
        }
    }

    pub fn pi(name: impl Into<String>, source: Raw, target: Raw) -> Raw {
        Raw::Pi {
            name: name.into(),
            source: Box::new(source),
            target: Box::new(target),
        }
    }

    pub fn application(function: Raw, arguments: Vec<Raw>) -> Raw {
        Raw::Application {
            function: Box::new(function),
            arguments,
        }
    }

    pub fn pair(first: Raw, second: Raw) -> Raw {
        Raw::Pair {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

fn binder(f: &mut Formatter<'_>, name: &str, annotation: Option<&BoxRaw>) -> fmt::Result {
    match annotation {
        Some(ty) => write!(f, "({name} {ty})"),
        None => f.write_str(name),
    }
}

/// Renders a raw term in the concrete syntax accepted by the parser.
impl Display for Raw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Raw::Universe(0) => f.write_str("Type"),
            Raw::Universe(n) => write!(f, "Type{n}"),
            Raw::Name(name) => f.write_str(name),
            Raw::Metavariable(id) => write!(f, "?{id}"),
            Raw::Pi {
                name,
                source,
                target,
            } => write!(f, "(Pi {name} {source} {target})"),
            Raw::Arrow { source, target } => write!(f, "(-> {source} {target})"),
            Raw::Lambda {
                name,
                annotation,
                body,
            } => {
                f.write_str("(lam ")?;
                binder(f, name, annotation.as_ref())?;
                write!(f, " {body})")
            }
            Raw::Application {
                function,
                arguments,
            } => {
                write!(f, "({function}")?;
                for arg in arguments {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Raw::Sigma {
                name,
                first,
                second,
            } => write!(f, "(Sigma {name} {first} {second})"),
            Raw::Pair { first, second } => write!(f, "(pair {first} {second})"),
            Raw::Fst(p) => write!(f, "(fst {p})"),
            Raw::Snd(p) => write!(f, "(snd {p})"),
            Raw::Let {
                name,
                annotation,
                value,
                body,
            } => {
                f.write_str("(let ")?;
                binder(f, name, annotation.as_ref())?;
                write!(f, " {value} {body})")
            }
            Raw::Id { ty, lhs, rhs } => write!(f, "(Id {ty} {lhs} {rhs})"),
            Raw::Refl { ty, point } => write!(f, "(refl {ty} {point})"),
            Raw::J {
                ty,
                motive,
                base,
                lhs,
                rhs,
                proof,
            } => write!(f, "(J {ty} {motive} {base} {lhs} {rhs} {proof})"),
            #[cfg(feature = "cubical")]
            Raw::Cubical(c) => c.fmt(f),
        }
    }
}

#[cfg(feature = "cubical")]
impl Display for RawDim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RawDim::Zero => f.write_str("i0"),
            RawDim::One => f.write_str("i1"),
            RawDim::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(feature = "cubical")]
impl Display for RawFace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RawFace::Top => f.write_str("top"),
            RawFace::Bot => f.write_str("bot"),
            RawFace::Eq(name, is_one) => write!(f, "(= {name} {})", u8::from(*is_one)),
            RawFace::And(l, r) => write!(f, "(and {l} {r})"),
            RawFace::Or(l, r) => write!(f, "(or {l} {r})"),
        }
    }
}

#[cfg(feature = "cubical")]
fn branches(f: &mut Formatter<'_>, branches: &[RawBranch]) -> fmt::Result {
    for b in branches {
        write!(f, " [{} {}]", b.face, b.term)?;
    }
    Ok(())
}

#[cfg(feature = "cubical")]
impl Display for RawCubical {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RawCubical::Interval => f.write_str("I"),
            RawCubical::Dim(dim) => dim.fmt(f),
            RawCubical::Path { ty, lhs, rhs } => write!(f, "(Path {ty} {lhs} {rhs})"),
            RawCubical::PathP {
                name,
                family,
                lhs,
                rhs,
            } => write!(f, "(PathP {name} {family} {lhs} {rhs})"),
            RawCubical::PathLambda { name, body } => write!(f, "(plam {name} {body})"),
            RawCubical::PathApplication { path, dimension } => {
                write!(f, "(@ {path} {dimension})")
            }
            RawCubical::Transport { name, family, base } => {
                write!(f, "(transport {name} {family} {base})")
            }
            RawCubical::Partial { face, ty } => write!(f, "(Partial {face} {ty})"),
            RawCubical::System(bs) => {
                f.write_str("(system")?;
                branches(f, bs)?;
                f.write_str(")")
            }
            RawCubical::Comp {
                name,
                family,
                face,
                tube,
                base,
            } => write!(f, "(comp {name} {family} {face} {tube} {base})"),
            RawCubical::HComp {
                ty,
                face,
                name,
                tube,
                base,
            } => write!(f, "(hcomp {ty} {face} {name} {tube} {base})"),
            RawCubical::Fill {
                name,
                family,
                face,
                tube,
                base,
            } => write!(f, "(fill {name} {family} {face} {tube} {base})"),
            RawCubical::Glue { ty, branches } => {
                write!(f, "(Glue {ty}")?;
                for b in branches {
                    write!(f, " [{} {} {}]", b.face, b.fiber, b.equiv)?;
                }
                f.write_str(")")
            }
            RawCubical::GlueElem { base, branches: bs } => {
                write!(f, "(glue {base}")?;
                branches(f, bs)?;
                f.write_str(")")
            }
            RawCubical::Unglue { ty, glued } => write!(f, "(unglue {ty} {glued})"),
            RawCubical::Ua { lhs, rhs, equiv } => write!(f, "(ua {lhs} {rhs} {equiv})"),
            RawCubical::UaBeta { equiv, argument } => write!(f, "(ua-beta {equiv} {argument})"),
            RawCubical::Hit {
                hit,
                constructor,
                arguments,
                dimensions,
            } => {
                write!(f, "(hit {hit} {constructor} (")?;
                for (i, a) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(") (")?;
                for (i, d) in dimensions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{d}")?;
                }
                f.write_str("))")
            }
        }
    }
}
