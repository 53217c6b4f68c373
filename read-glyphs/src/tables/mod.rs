//! Readers for the tables needed to load and hint glyphs.

pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod loca;
pub mod maxp;

/// The [glyf (Glyph Data)](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf) table.
pub mod glyf {
    use font_types::Tag;

    pub const TAG: Tag = Tag::new(b"glyf");
}

/// The [cvt (Control Value Table)](https://learn.microsoft.com/en-us/typography/opentype/spec/cvt) table.
pub mod cvt {
    use font_types::Tag;

    pub const TAG: Tag = Tag::new(b"cvt ");
}

/// The [fpgm (Font Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/fpgm) table.
pub mod fpgm {
    use font_types::Tag;

    pub const TAG: Tag = Tag::new(b"fpgm");
}

/// The [prep (Control Value Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/prep) table.
pub mod prep {
    use font_types::Tag;

    pub const TAG: Tag = Tag::new(b"prep");
}
