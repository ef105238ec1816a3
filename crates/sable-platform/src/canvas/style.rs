/// Shape drawn at the open ends of stroked lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    Butt,
    Round,
    #[default]
    Square,
}

/// Shape drawn where two stroked segments meet.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Porter-Duff compositing rule (plus multiply) applied to every draw.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Composite {
    /// Source replaces destination.
    Src,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
    Multiply,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

impl From<Composite> for tiny_skia::BlendMode {
    fn from(op: Composite) -> Self {
        use tiny_skia::BlendMode as B;
        match op {
            Composite::Src => B::Source,
            Composite::SrcOver => B::SourceOver,
            Composite::DstOver => B::DestinationOver,
            Composite::SrcIn => B::SourceIn,
            Composite::DstIn => B::DestinationIn,
            Composite::SrcOut => B::SourceOut,
            Composite::DstOut => B::DestinationOut,
            Composite::SrcAtop => B::SourceAtop,
            Composite::DstAtop => B::DestinationAtop,
            Composite::Xor => B::Xor,
            Composite::Multiply => B::Multiply,
        }
    }
}
