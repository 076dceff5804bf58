use elegance::{Io, Printer, Render};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// The default page width used when dumping terms for humans.
pub const COLUMNS: usize = 80;

/// The widest page elegance accepts. Groups shorter than this never break,
/// so debug output compared against goldens is rendered at this width.
pub const UNBOUNDED: usize = 65536;

const INDENT: isize = 1;

pub trait PP {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error>;
}

impl<T: PP + ?Sized> PP for Rc<T> {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        self.as_ref().print(p)
    }
}

impl<T: PP + ?Sized> PP for Arc<T> {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        self.as_ref().print(p)
    }
}

impl<T: PP + ?Sized> PP for Box<T> {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        self.as_ref().print(p)
    }
}

/// Print `f` surrounded by parentheses, as a single consistent group.
pub fn parens<R, F>(p: &mut Printer<R>, f: F) -> Result<(), R::Error>
where
    R: Render,
    F: FnOnce(&mut Printer<R>) -> Result<(), R::Error>,
{
    p.cgroup(INDENT, |p| {
        p.text("(")?;
        f(p)?;
        p.text(")")
    })
}

/// Print `f` surrounded by square brackets.
pub fn brackets<R, F>(p: &mut Printer<R>, f: F) -> Result<(), R::Error>
where
    R: Render,
    F: FnOnce(&mut Printer<R>) -> Result<(), R::Error>,
{
    p.cgroup(INDENT, |p| {
        p.text("[")?;
        f(p)?;
        p.text("]")
    })
}

/// Print each item, separated by `sep` followed by a breakable space.
pub fn print_separated<'a, R, T, I>(
    p: &mut Printer<R>,
    items: I,
    sep: &'static str,
) -> Result<(), R::Error>
where
    R: Render,
    T: PP + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            p.text(sep)?;
            p.space()?;
        }
        item.print(p)?;
    }
    Ok(())
}

/// Print each item preceded by a breakable space.
pub fn print_spaced<'a, R, T, I>(p: &mut Printer<R>, items: I) -> Result<(), R::Error>
where
    R: Render,
    T: PP + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for item in items {
        p.space()?;
        item.print(p)?;
    }
    Ok(())
}

pub fn dump<T: PP + ?Sized>(x: &T) {
    let mut p = Printer::new(Io(std::io::stdout()), COLUMNS);
    let _ = x.print(&mut p);
    let _ = p.hard_break();
    let _ = p.finish();
}

pub fn dump_to_str<T: PP + ?Sized>(x: &T) -> String {
    render(x, COLUMNS)
}

/// Render on a single line, unless a group is longer than [`UNBOUNDED`].
pub fn to_line<T: PP + ?Sized>(x: &T) -> String {
    render(x, UNBOUNDED)
}

fn render<T: PP + ?Sized>(x: &T, width: usize) -> String {
    let mut p = Printer::new(String::new(), width);
    let _ = x.print(&mut p);
    p.finish().unwrap_or_default()
}

/// Adapts any printable value to `Display`, rendering it on one line.
pub struct Pretty<'a, T: ?Sized>(pub &'a T);

impl<T: PP + ?Sized> fmt::Display for Pretty<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_line(self.0))
    }
}
