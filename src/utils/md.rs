use std::io::IsTerminal;

use crate::registry::Benchmark;

pub fn print_md(s: impl AsRef<str>) {
    let mut printer = MarkdownPrinter::new();
    printer.add(s);
    printer.dump();
}

/// Collects markdown and renders it with `termimad` when stdout is a terminal.
/// Otherwise the raw markdown is printed.
pub struct MarkdownPrinter {
    content: String,
}

impl MarkdownPrinter {
    pub fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn is_tty(&self) -> bool {
        std::io::stdout().is_terminal()
    }

    pub fn dump(&self) {
        if self.is_tty() {
            let mut skin = termimad::MadSkin::default();
            for header in skin.headers.iter_mut() {
                header.align = termimad::Alignment::Left;
                header.add_attr(termimad::crossterm::style::Attribute::Bold);
                header.set_fg(termimad::crossterm::style::Color::Blue);
            }
            skin.headers[0].set_bg(termimad::crossterm::style::Color::Blue);
            skin.headers[0].add_attr(termimad::crossterm::style::Attribute::NoUnderline);
            skin.print_text(&self.content);
        } else {
            println!("{}", self.content);
        }
    }

    pub fn add(&mut self, s: impl AsRef<str>) {
        self.content.push_str(s.as_ref());
    }

    /// Append a `benchmark | runtime | uncertainty` table. Unmeasured benchmarks show `-`.
    pub fn add_benchmark_table<'a>(&mut self, benchmarks: impl IntoIterator<Item = &'a Benchmark>) {
        self.add("|benchmark|runtime (ns)|uncertainty (%)|\n");
        self.add("|:-|-:|-:|\n");
        for b in benchmarks {
            match b.measurement() {
                Some(m) => self.add(format!(
                    "|{}|{:.2}|{:.2}|\n",
                    b.name, m.runtime_ns, m.uncertainty_pct
                )),
                None => self.add(format!("|{}|-|-|\n", b.name)),
            }
        }
    }
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! print_md {
    ($($arg:tt)*) => {
        $crate::utils::md::print_md(format!($($arg)*));
    };
}
