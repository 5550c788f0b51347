//! Declarative annotations attached to reflected members.
//!
//! Annotations are plain data produced by `#[derive(Inspect)]` and
//! `#[inspect_methods]`. Each one remembers the source line it was written
//! on; the first annotation's line becomes the member's ordering hint.

/// Layout kind of a group annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Names a group without choosing its layout. Any concrete kind on the
    /// same path replaces it.
    Placeholder,
    Box,
    Vertical,
    Horizontal,
    Foldout,
    Tab,
}

impl GroupKind {
    pub fn name(self) -> &'static str {
        match self {
            GroupKind::Placeholder => "Group",
            GroupKind::Box => "BoxGroup",
            GroupKind::Vertical => "VerticalGroup",
            GroupKind::Horizontal => "HorizontalGroup",
            GroupKind::Foldout => "FoldoutGroup",
            GroupKind::Tab => "TabGroup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAnnotation {
    pub kind: GroupKind,
    /// Slash-separated path, e.g. `"Settings/Audio"`.
    pub path: String,
    pub title: Option<String>,
    pub show_title: bool,
    /// Background color as `0xRRGGBBAA`.
    pub back_color: Option<u32>,
}

impl GroupAnnotation {
    pub fn new(kind: GroupKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            title: None,
            show_title: true,
            back_color: None,
        }
    }
}

/// Reference to another member, optionally compared against an enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub member: String,
    pub equals: Option<String>,
}

impl Condition {
    pub fn member(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            equals: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// When a button may be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonMode {
    #[default]
    Always,
    Editor,
    Playmode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Min(f64),
    Max(f64),
    Required { message: Option<String> },
    /// Calls a `bool` method; `false` shows `message`.
    Input {
        callback: String,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    Group(GroupAnnotation),
    Show,
    Hide,
    ShowIf(Condition),
    HideIf(Condition),
    EnableIf(Condition),
    DisableIf(Condition),
    ReadOnly,
    Label(String),
    InfoBox { text: String, kind: MessageKind },
    Button { text: Option<String>, mode: ButtonMode },
    OnGui { pre: Option<String>, post: Option<String> },
    OnValueChanged(String),
    Validate(Validator),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Source line of the attribute, used as the ordering hint.
    pub line: u32,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn new(line: u32, kind: AnnotationKind) -> Self {
        Self { line, kind }
    }

    pub fn group(&self) -> Option<&GroupAnnotation> {
        match &self.kind {
            AnnotationKind::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// Convenience queries over a member's annotation list.
pub trait AnnotationsExt {
    fn has(&self, pred: impl Fn(&AnnotationKind) -> bool) -> bool;
    fn groups(&self) -> impl Iterator<Item = &GroupAnnotation>;
    fn label(&self) -> Option<&str>;
    fn validators(&self) -> impl Iterator<Item = &Validator>;
}

impl AnnotationsExt for [Annotation] {
    fn has(&self, pred: impl Fn(&AnnotationKind) -> bool) -> bool {
        self.iter().any(|a| pred(&a.kind))
    }

    fn groups(&self) -> impl Iterator<Item = &GroupAnnotation> {
        self.iter().filter_map(Annotation::group)
    }

    fn label(&self) -> Option<&str> {
        self.iter().find_map(|a| match &a.kind {
            AnnotationKind::Label(text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn validators(&self) -> impl Iterator<Item = &Validator> {
        self.iter().filter_map(|a| match &a.kind {
            AnnotationKind::Validate(v) => Some(v),
            _ => None,
        })
    }
}
