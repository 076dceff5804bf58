//! The debug printer for core syntax.
//!
//! Terms print as nameless s-expressions: variables as `{n}`, interval
//! variables as `i{n}`, binder hints kept for reading only. The single-line
//! rendering is a stable format that tests compare against.

#[cfg(feature = "cubical")]
use crate::syn::cubical::*;
use crate::syn::{Hint, Syntax, Term};
use elegance::{Printer, Render};
use hott_support::{parens, print_spaced, to_line, PP};
use std::fmt;

/// Print a keyword form `(head x y ...)`.
fn form<R: Render>(p: &mut Printer<R>, head: &'static str, args: &[&Term]) -> Result<(), R::Error> {
    parens(p, |p| {
        p.text(head)?;
        print_spaced(p, args.iter().copied())
    })
}

/// Print `(Pi x: A . B)` and `(Sigma x: A . B)`.
fn binder_form<R: Render>(
    p: &mut Printer<R>,
    head: &'static str,
    hint: &Hint,
    source: &Term,
    target: &Term,
) -> Result<(), R::Error> {
    parens(p, |p| {
        p.text(head)?;
        p.text(" ")?;
        p.text_owned(hint.as_str())?;
        p.text(":")?;
        p.space()?;
        source.print(p)?;
        p.text(" .")?;
        p.space()?;
        target.print(p)
    })
}

fn annotation<R: Render>(p: &mut Printer<R>, annotation: Option<&Term>) -> Result<(), R::Error> {
    if let Some(ty) = annotation {
        p.text(" :")?;
        p.space()?;
        ty.print(p)?;
    }
    Ok(())
}

impl PP for Syntax {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        match self {
            Syntax::Universe(u) => p.text_owned(format!("Type{}", u.level)),
            Syntax::Variable(var) => p.text_owned(var.index.to_string()),
            Syntax::Global(global) => p.text_owned(&*global.name),
            Syntax::Pi(pi) => binder_form(p, "Pi", &pi.hint, &pi.source, &pi.target),
            Syntax::Lambda(lam) => parens(p, |p| {
                p.text("\\")?;
                p.text_owned(lam.hint.as_str())?;
                annotation(p, lam.annotation.as_ref())?;
                p.text(" =>")?;
                p.space()?;
                lam.body.print(p)
            }),
            Syntax::Application(app) => {
                let mut head = &app.function;
                let mut args = vec![&app.argument];
                while let Syntax::Application(inner) = head.as_ref() {
                    args.push(&inner.argument);
                    head = &inner.function;
                }
                args.reverse();
                parens(p, |p| {
                    head.print(p)?;
                    print_spaced(p, args)
                })
            }
            Syntax::Sigma(sigma) => {
                binder_form(p, "Sigma", &sigma.hint, &sigma.first, &sigma.second)
            }
            Syntax::Pair(pair) => parens(p, |p| {
                pair.first.print(p)?;
                p.text(" ,")?;
                p.space()?;
                pair.second.print(p)
            }),
            Syntax::Fst(fst) => form(p, "fst", &[&fst.pair]),
            Syntax::Snd(snd) => form(p, "snd", &[&snd.pair]),
            Syntax::Let(l) => parens(p, |p| {
                p.text("let ")?;
                p.text_owned(l.hint.as_str())?;
                annotation(p, l.annotation.as_ref())?;
                p.text(" =")?;
                p.space()?;
                l.value.print(p)?;
                p.text(" in")?;
                p.space()?;
                l.body.print(p)
            }),
            Syntax::Id(id) => form(p, "Id", &[&id.ty, &id.lhs, &id.rhs]),
            Syntax::Refl(refl) => form(p, "refl", &[&refl.ty, &refl.point]),
            Syntax::J(j) => form(
                p,
                "J",
                &[&j.ty, &j.motive, &j.base, &j.lhs, &j.rhs, &j.proof],
            ),
            Syntax::Metavariable(meta) => {
                if meta.arguments.is_empty() {
                    p.text_owned(meta.id.to_string())
                } else {
                    parens(p, |p| {
                        p.text_owned(meta.id.to_string())?;
                        print_spaced(p, &meta.arguments)
                    })
                }
            }
            #[cfg(feature = "cubical")]
            Syntax::Cubical(c) => c.print(p),
        }
    }
}

#[cfg(feature = "cubical")]
impl<V: fmt::Display> PP for Face<V> {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        match self {
            Face::Top => p.text("⊤"),
            Face::Bot => p.text("⊥"),
            Face::Eq(var, is_one) => p.text_owned(format!("({var} = {})", u8::from(*is_one))),
            Face::And(l, r) => connective(p, l, "∧", r),
            Face::Or(l, r) => connective(p, l, "∨", r),
        }
    }
}

#[cfg(feature = "cubical")]
fn connective<R: Render, V: fmt::Display>(
    p: &mut Printer<R>,
    lhs: &Face<V>,
    op: &'static str,
    rhs: &Face<V>,
) -> Result<(), R::Error> {
    parens(p, |p| {
        lhs.print(p)?;
        p.text(" ")?;
        p.text(op)?;
        p.space()?;
        rhs.print(p)
    })
}

/// Print `[φ ↦ t]`.
#[cfg(feature = "cubical")]
fn branch<R: Render>(p: &mut Printer<R>, face: &Face, terms: &[&Term]) -> Result<(), R::Error> {
    hott_support::brackets(p, |p| {
        face.print(p)?;
        p.text(" ↦")?;
        print_spaced(p, terms.iter().copied())
    })
}

#[cfg(feature = "cubical")]
fn composition<R: Render>(
    p: &mut Printer<R>,
    head: &'static str,
    ty: &Term,
    face: &Face,
    tube: &Term,
    base: &Term,
) -> Result<(), R::Error> {
    parens(p, |p| {
        p.text(head)?;
        p.space()?;
        ty.print(p)?;
        p.space()?;
        face.print(p)?;
        p.space()?;
        tube.print(p)?;
        p.space()?;
        base.print(p)
    })
}

#[cfg(feature = "cubical")]
impl PP for Cubical {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        match self {
            Cubical::Interval => p.text("I"),
            Cubical::Zero => p.text("i0"),
            Cubical::One => p.text("i1"),
            Cubical::Dimension(dim) => p.text_owned(dim.index.to_string()),
            Cubical::Path(path) => form(p, "Path", &[&path.ty, &path.lhs, &path.rhs]),
            Cubical::PathP(pathp) => form(p, "PathP", &[&pathp.family, &pathp.lhs, &pathp.rhs]),
            Cubical::PathLambda(plam) => parens(p, |p| {
                p.text_owned(format!("<{}>", plam.hint.as_str()))?;
                p.space()?;
                plam.body.print(p)
            }),
            Cubical::PathApplication(papp) => parens(p, |p| {
                papp.path.print(p)?;
                p.text(" @")?;
                p.space()?;
                papp.dimension.print(p)
            }),
            Cubical::Transport(tr) => form(p, "transport", &[&tr.family, &tr.base]),
            Cubical::Partial(partial) => parens(p, |p| {
                p.text("Partial ")?;
                partial.face.print(p)?;
                p.space()?;
                partial.ty.print(p)
            }),
            Cubical::System(system) => parens(p, |p| {
                p.text("system")?;
                for b in &system.branches {
                    p.space()?;
                    branch(p, &b.face, &[&b.term])?;
                }
                Ok(())
            }),
            Cubical::Comp(c) => composition(p, "comp", &c.family, &c.face, &c.tube, &c.base),
            Cubical::Fill(c) => composition(p, "fill", &c.family, &c.face, &c.tube, &c.base),
            Cubical::HComp(c) => composition(p, "hcomp", &c.ty, &c.face, &c.tube, &c.base),
            Cubical::Glue(glue) => parens(p, |p| {
                p.text("Glue ")?;
                glue.ty.print(p)?;
                for b in &glue.branches {
                    p.space()?;
                    branch(p, &b.face, &[&b.fiber, &b.equiv])?;
                }
                Ok(())
            }),
            Cubical::GlueElem(elem) => parens(p, |p| {
                p.text("glue ")?;
                elem.base.print(p)?;
                for b in &elem.branches {
                    p.space()?;
                    branch(p, &b.face, &[&b.term])?;
                }
                Ok(())
            }),
            Cubical::Unglue(u) => form(p, "unglue", &[&u.ty, &u.glued]),
            Cubical::Ua(ua) => form(p, "ua", &[&ua.lhs, &ua.rhs, &ua.equiv]),
            Cubical::UaBeta(beta) => form(p, "ua-beta", &[&beta.equiv, &beta.argument]),
            Cubical::HitApplication(app) => parens(p, |p| {
                p.text("hit ")?;
                p.text_owned(&*app.hit)?;
                p.text(" ")?;
                p.text_owned(&*app.constructor)?;
                p.space()?;
                hott_support::brackets(p, |p| hott_support::print_separated(p, &app.arguments, ""))?;
                p.space()?;
                hott_support::brackets(p, |p| {
                    hott_support::print_separated(p, &app.dimensions, "")
                })
            }),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_line(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MetaVariableId;
    use insta::assert_snapshot;

    fn g(name: &str) -> Term {
        Syntax::global(name)
    }

    #[test]
    fn test_print_pi_and_lambda() {
        let pi = Syntax::pi("x", Syntax::universe(0), Syntax::variable(0));
        assert_snapshot!(pi.to_string(), @"(Pi x: Type0 . {0})");
        let lam = Syntax::lambda("x", Syntax::variable(0));
        assert_snapshot!(lam.to_string(), @r"(\x => {0})");
        let anon = Syntax::lambda(Hint::anonymous(), Syntax::variable(0));
        assert_snapshot!(anon.to_string(), @r"(\_ => {0})");
        let ann = Syntax::annotated_lambda("x", g("A"), Syntax::variable(0));
        assert_snapshot!(ann.to_string(), @r"(\x : A => {0})");
    }

    #[test]
    fn test_print_flattens_spines() {
        let t = Syntax::applications(g("f"), [Syntax::variable(0), Syntax::variable(1)]);
        assert_snapshot!(t.to_string(), @"(f {0} {1})");
    }

    #[test]
    fn test_print_sigma_pair_projections() {
        let sigma = Syntax::sigma("x", g("A"), g("B"));
        assert_snapshot!(sigma.to_string(), @"(Sigma x: A . B)");
        let pair = Syntax::pair(g("a"), g("b"));
        assert_snapshot!(pair.to_string(), @"(a , b)");
        assert_snapshot!(Syntax::fst(pair.clone()).to_string(), @"(fst (a , b))");
        assert_snapshot!(Syntax::snd(pair).to_string(), @"(snd (a , b))");
    }

    #[test]
    fn test_print_let() {
        let t = Syntax::let_in("x", Some(g("A")), g("a"), Syntax::variable(0));
        assert_snapshot!(t.to_string(), @"(let x : A = a in {0})");
    }

    #[test]
    fn test_print_identity_types() {
        assert_snapshot!(Syntax::id(g("A"), g("x"), g("y")).to_string(), @"(Id A x y)");
        assert_snapshot!(Syntax::refl(g("A"), g("x")).to_string(), @"(refl A x)");
        let j = Syntax::j(g("A"), g("C"), g("d"), g("x"), g("y"), g("p"));
        assert_snapshot!(j.to_string(), @"(J A C d x y p)");
    }

    #[test]
    fn test_print_metavariables() {
        let bare = Syntax::metavariable(MetaVariableId(0), vec![]);
        assert_snapshot!(bare.to_string(), @"?0");
        let applied = Syntax::metavariable(MetaVariableId(2), vec![g("a"), g("b")]);
        assert_snapshot!(applied.to_string(), @"(?2 a b)");
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_print_cubical() {
        use crate::common::DimIndex;

        let plam = Syntax::path_lambda("i", Syntax::path_application(g("p"), Syntax::dimension(0)));
        assert_snapshot!(plam.to_string(), @"(<i> (p @ i{0}))");
        let tr = Syntax::transport("i", g("A"), g("e"));
        assert_snapshot!(tr.to_string(), @"(transport A e)");
        assert_snapshot!(Syntax::path(g("A"), Syntax::dim_zero(), Syntax::dim_one()).to_string(), @"(Path A i0 i1)");
        let face = Face::and(Face::atom(DimIndex(0), true), Face::atom(DimIndex(1), false));
        assert_snapshot!(hott_support::to_line(&face), @"((i{0} = 1) ∧ (i{1} = 0))");
        assert_snapshot!(hott_support::to_line(&Face::<DimIndex>::Top), @"⊤");
        assert_snapshot!(hott_support::to_line(&Face::<DimIndex>::Bot), @"⊥");
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_print_systems_and_hits() {
        use crate::common::DimIndex;

        let sys = Syntax::system(vec![Branch::new(Face::atom(DimIndex(0), true), g("a"))]);
        assert_snapshot!(sys.to_string(), @"(system [(i{0} = 1) ↦ a])");
        let hit = Syntax::hit_application("S1", "loop", vec![], vec![Syntax::dimension(0)]);
        assert_snapshot!(hit.to_string(), @"(hit S1 loop [] [i{0}])");
        let hcomp = Syntax::hcomp(g("A"), Face::Top, "j", g("u"), g("a"));
        assert_snapshot!(hcomp.to_string(), @"(hcomp A ⊤ u a)");
    }
}
