//! Page layout: portfolio sections stacked into rows of styled text.

use folio_background::{blend, fade};
use folio_content::{Link, Portfolio, Project, Section, SectionBody};
use folio_core::{ColorTheme, ElementId};
use folio_reveal::RowSpan;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use textwrap::{Options, WordSplitter, WrapAlgorithm};
use unicode_width::UnicodeWidthStr;

/// Widest the content column gets.
pub const MAX_WIDTH: u16 = 96;

/// Blank rows between sections.
const SECTION_GAP: u32 = 2;

/// Card gutter drawn in front of every card line.
const GUTTER: &str = "▌ ";

/// Visual role of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Name,
    Heading,
    Title,
    Body,
    Muted,
    Accent,
    Tag,
}

impl Role {
    fn color(self, theme: ColorTheme) -> Color {
        match self {
            Role::Name | Role::Tag => theme.highlight(),
            Role::Heading | Role::Title => Color::White,
            Role::Body => Color::Rgb(209, 213, 219),
            Role::Muted => Color::Rgb(156, 163, 175),
            Role::Accent => theme.accent(),
        }
    }

    fn modifier(self) -> Modifier {
        match self {
            Role::Name | Role::Heading | Role::Title => Modifier::BOLD,
            _ => Modifier::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub role: Role,
}

impl Segment {
    fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// One row of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLine {
    pub segments: Vec<Segment>,
    pub centered: bool,
    /// Drawn on the section card background.
    pub card: bool,
}

impl PageLine {
    fn blank() -> Self {
        Self::default()
    }

    fn centered(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            centered: true,
            card: false,
        }
    }

    fn card(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            centered: false,
            card: true,
        }
    }

    /// Plain text of the row, without card decoration.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Styled line at `opacity`, padded to `width` when on a card.
    fn to_line(&self, theme: ColorTheme, opacity: f32, width: u16) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::with_capacity(self.segments.len() + 2);
        if self.card {
            spans.push(Span::styled(GUTTER, Style::new().fg(fade(theme.accent(), opacity))));
        }
        spans.extend(self.segments.iter().map(|segment| {
            let style = Style::new()
                .fg(fade(segment.role.color(theme), opacity))
                .add_modifier(segment.role.modifier());
            Span::styled(segment.text.clone(), style)
        }));

        let mut line = Line::from(spans);
        if self.card {
            let pad = (width as usize).saturating_sub(line.width());
            line.push_span(Span::raw(" ".repeat(pad)));
            line = line.style(Style::new().bg(fade(card_background(theme), opacity)));
        }
        line
    }
}

fn card_background(theme: ColorTheme) -> Color {
    blend(Color::Black, theme.accent(), 0.22)
}

/// Rows of one section and where they sit on the page.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub element: ElementId,
    pub span: RowSpan,
    pub lines: Vec<PageLine>,
}

/// Laid-out page.
#[derive(Debug, Clone)]
pub struct Page {
    width: u16,
    height: u32,
    sections: Vec<SectionView>,
}

impl Page {
    /// Lay out `portfolio` for a terminal `terminal_width` columns wide.
    pub fn layout(portfolio: &Portfolio, terminal_width: u16) -> Self {
        let width = terminal_width.saturating_sub(4).clamp(20, MAX_WIDTH);
        let inner = (width as usize).saturating_sub(GUTTER.width() + 1);

        let mut top = 1;
        let mut sections = Vec::with_capacity(portfolio.sections.len());
        for (index, section) in portfolio.sections.iter().enumerate() {
            let lines = section_lines(portfolio, section, width as usize, inner);
            let span = RowSpan::new(top, lines.len() as u32);
            top = span.bottom() + SECTION_GAP;
            sections.push(SectionView {
                element: ElementId(index),
                span,
                lines,
            });
        }

        Self {
            width,
            height: top.saturating_sub(SECTION_GAP) + 1,
            sections,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total rows, including margins.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sections(&self) -> &[SectionView] {
        &self.sections
    }

    /// Index of the section covering page row `row`.
    pub fn section_at(&self, row: u32) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| row >= s.span.top && row < s.span.bottom())
    }

    /// First row of section `index`.
    pub fn anchor(&self, index: usize) -> Option<u32> {
        self.sections.get(index).map(|s| s.span.top)
    }

    fn line_at(&self, row: u32) -> Option<(usize, &PageLine)> {
        let index = self.section_at(row)?;
        let section = &self.sections[index];
        Some((index, &section.lines[(row - section.span.top) as usize]))
    }
}

fn section_lines(portfolio: &Portfolio, section: &Section, width: usize, inner: usize) -> Vec<PageLine> {
    match &section.body {
        SectionBody::Hero => hero_lines(portfolio, width),
        SectionBody::Text { text } => {
            let mut lines = card_header(&section.title);
            lines.extend(
                wrap(text, inner)
                    .into_iter()
                    .map(|row| PageLine::card(vec![Segment::new(row, Role::Body)])),
            );
            lines.push(PageLine::card(Vec::new()));
            lines
        }
        SectionBody::Projects { projects } => {
            let mut lines = vec![
                PageLine::centered(vec![Segment::new(section.title.clone(), Role::Heading)]),
                PageLine::blank(),
            ];
            for (i, project) in projects.iter().enumerate() {
                if i > 0 {
                    lines.push(PageLine::blank());
                }
                lines.extend(project_lines(project, inner));
            }
            lines
        }
        SectionBody::Links { links } => {
            let mut lines = card_header(&section.title);
            lines.extend(links.iter().flat_map(|link| link_lines(link, inner)));
            lines.push(PageLine::card(Vec::new()));
            lines
        }
    }
}

fn hero_lines(portfolio: &Portfolio, width: usize) -> Vec<PageLine> {
    let profile = &portfolio.profile;
    let rule = "━".repeat(profile.name.width().min(width));
    let mut lines = vec![PageLine::blank()];
    lines.extend(
        wrap(&profile.name, width)
            .into_iter()
            .map(|row| PageLine::centered(vec![Segment::new(row, Role::Name)])),
    );
    lines.push(PageLine::centered(vec![Segment::new(rule, Role::Accent)]));
    lines.push(PageLine::blank());
    lines.extend(
        wrap(&profile.tagline, width)
            .into_iter()
            .map(|row| PageLine::centered(vec![Segment::new(row, Role::Body)])),
    );
    if !profile.links.is_empty() {
        lines.push(PageLine::blank());
        lines.extend(profile.links.iter().flat_map(|link| link_badge(link, width)));
    }
    lines.push(PageLine::blank());
    lines
}

fn link_badge(link: &Link, width: usize) -> Vec<PageLine> {
    let badge = format!("[ {} ]", link.label);
    if badge.width() + 1 + link.url.width() <= width {
        return vec![PageLine::centered(vec![
            Segment::new(badge, Role::Accent),
            Segment::new(format!(" {}", link.url), Role::Muted),
        ])];
    }
    let mut lines = vec![PageLine::centered(vec![Segment::new(badge, Role::Accent)])];
    lines.extend(
        wrap(&link.url, width)
            .into_iter()
            .map(|row| PageLine::centered(vec![Segment::new(row, Role::Muted)])),
    );
    lines
}

fn link_lines(link: &Link, inner: usize) -> Vec<PageLine> {
    let mut segments = vec![
        Segment::new("• ", Role::Accent),
        Segment::new(link.label.clone(), Role::Title),
    ];
    if 2 + link.label.width() + 2 + link.url.width() <= inner {
        segments.push(Segment::new(format!("  {}", link.url), Role::Muted));
        return vec![PageLine::card(segments)];
    }
    let mut lines = vec![PageLine::card(segments)];
    lines.extend(
        wrap(&link.url, inner.saturating_sub(2))
            .into_iter()
            .map(|row| PageLine::card(vec![Segment::new(format!("  {row}"), Role::Muted)])),
    );
    lines
}

fn card_header(title: &str) -> Vec<PageLine> {
    vec![
        PageLine::card(Vec::new()),
        PageLine::card(vec![Segment::new(title, Role::Heading)]),
        PageLine::card(Vec::new()),
    ]
}

fn project_lines(project: &Project, inner: usize) -> Vec<PageLine> {
    let mut lines = vec![PageLine::card(Vec::new())];
    lines.extend(
        wrap(&project.title, inner)
            .into_iter()
            .map(|row| PageLine::card(vec![Segment::new(row, Role::Title)])),
    );
    lines.push(PageLine::card(Vec::new()));
    lines.extend(
        wrap(&project.description, inner)
            .into_iter()
            .map(|row| PageLine::card(vec![Segment::new(row, Role::Muted)])),
    );
    if !project.skills.is_empty() {
        lines.push(PageLine::card(Vec::new()));
        let tags: Vec<String> = project.skills.iter().map(|s| format!("[{s}]")).collect();
        for row in pack(&tags, inner) {
            let mut segments = Vec::with_capacity(row.len() * 2);
            for (i, tag) in row.into_iter().enumerate() {
                if i > 0 {
                    segments.push(Segment::new(" ", Role::Body));
                }
                segments.push(Segment::new(tag, Role::Tag));
            }
            lines.push(PageLine::card(segments));
        }
    }
    lines.push(PageLine::card(Vec::new()));
    lines
}

/// Word wrap to `width` display columns. Runs of whitespace collapse to one
/// space and words wider than a row are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    let options = Options::new(width.max(1))
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_splitter(WordSplitter::NoHyphenation);
    textwrap::wrap(&words.join(" "), options)
        .into_iter()
        .map(|row| row.into_owned())
        .collect()
}

/// Pack items into rows of at most `width` display columns, separated by one
/// space.
fn pack(items: &[String], width: usize) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut used = 0;
    for item in items {
        let len = item.width();
        if !row.is_empty() && used + 1 + len > width {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        used += if row.is_empty() { len } else { len + 1 };
        row.push(item.clone());
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Widget drawing the visible slice of a [`Page`].
pub struct PageView<'a> {
    pub page: &'a Page,
    pub scroll: u32,
    pub theme: ColorTheme,
    /// Opacity of each section, by section index.
    pub opacities: &'a [f32],
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.page.width.min(area.width);
        let left = area.x + (area.width - width) / 2;
        for y in 0..area.height {
            let Some((index, page_line)) = self.page.line_at(self.scroll + y as u32) else {
                continue;
            };
            let opacity = self.opacities.get(index).copied().unwrap_or(1.0);
            let line = page_line.to_line(self.theme, opacity, width);
            let offset = if page_line.centered {
                width.saturating_sub(line.width() as u16) / 2
            } else {
                0
            };
            buf.set_line(left + offset, area.y + y, &line, width - offset);
        }
    }
}
