use image::RgbImage;

use crate::common::grid::Color;
use crate::layout::{Rgb, SymbolLayout};

// Raster
//------------------------------------------------------------------------------

/// Flat RGB8 raster, 3 bytes per pixel, row-major. The input shape expected
/// by external PNG-style serializers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Bridges into the `image` crate for callers that want to save or
    /// post-process the raster directly.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("Pixel buffer matches dimensions")
    }
}

// Per-pixel region, derived once per row/column from the layout geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Border,
    Quiet,
    Cell(usize),
    Text,
}

/// Walks every output pixel and classifies it against the layout regions.
/// Colors are taken verbatim from the layout.
pub fn render_raster(layout: &SymbolLayout) -> RasterImage {
    let width = layout.width_px();
    let height = layout.height_px();
    let col_map = column_spans(layout);
    let row_map = row_spans(layout);
    debug_assert!(col_map.len() == width as usize, "Column map mismatch");
    debug_assert!(row_map.len() == height as usize, "Row map mismatch");

    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for &row in &row_map {
        for &col in &col_map {
            let dark = match (row, col) {
                (Span::Text, _) => false,
                (Span::Border, _) | (_, Span::Border) => true,
                (Span::Quiet, _) | (_, Span::Quiet) => false,
                (Span::Cell(r), Span::Cell(c)) => layout.grid.get(r, c) == Color::Dark,
                (Span::Cell(_), Span::Text) => unreachable!("Text is a row region"),
            };
            let Rgb(r, g, b) = if dark { layout.fg } else { layout.bg };
            pixels.extend([r, g, b]);
        }
    }
    RasterImage { width, height, pixels }
}

// One span entry per pixel column
fn column_spans(layout: &SymbolLayout) -> Vec<Span> {
    let border = layout.border;
    let qz = layout.quiet_zone;
    let grid_w = layout.grid.width() as u32;
    let mut spans = Vec::with_capacity(layout.width_px() as usize);
    for m in 0..layout.width_modules() {
        let span = if m < border || m >= border + 2 * qz + grid_w {
            Span::Border
        } else if m < border + qz || m >= border + qz + grid_w {
            Span::Quiet
        } else {
            Span::Cell((m - border - qz) as usize)
        };
        let run = layout.px(m + 1) - layout.px(m);
        spans.extend(std::iter::repeat(span).take(run as usize));
    }
    spans
}

// One span entry per pixel row, text band included
fn row_spans(layout: &SymbolLayout) -> Vec<Span> {
    let vm = layout.v_margin();
    let border = layout.border;
    let rows = layout.grid.height() as u32;
    let row_h = layout.row_height;
    let mut spans = Vec::with_capacity(layout.height_px() as usize);
    for m in 0..layout.height_modules() {
        let span = if m < border || m >= layout.height_modules() - border {
            Span::Border
        } else if m < vm || m >= vm + rows * row_h {
            Span::Quiet
        } else {
            Span::Cell(((m - vm) / row_h) as usize)
        };
        let run = layout.px(m + 1) - layout.px(m);
        spans.extend(std::iter::repeat(span).take(run as usize));
    }
    spans.resize(layout.height_px() as usize, Span::Text);
    spans
}

// Vector
//------------------------------------------------------------------------------

/// Rectangle-and-text primitive list, the input shape expected by external
/// SVG/EPS-style serializers. Glyph outlines for `Text` are the consumer's
/// concern; the primitive carries the band geometry and content only.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorPrimitive {
    Rect { x: u32, y: u32, w: u32, h: u32, color: Rgb },
    Text { x: u32, y: u32, height: u32, content: String, color: Rgb },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorPage {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<VectorPrimitive>,
}

/// Emits one rectangle per contiguous run of dark modules per row, plus
/// background, border frame and the text primitive.
pub fn render_vector(layout: &SymbolLayout) -> VectorPage {
    let width = layout.width_px();
    let height = layout.height_px();
    let mut prims = Vec::new();

    prims.push(VectorPrimitive::Rect { x: 0, y: 0, w: width, h: height, color: layout.bg });

    if layout.border > 0 {
        let b = layout.px(layout.border);
        let sh = layout.symbol_height_px();
        let frame = [
            (0, 0, width, b),      // top
            (0, sh - b, width, b), // bottom
            (0, 0, b, sh),         // left
            (width - b, 0, b, sh), // right
        ];
        for (x, y, w, h) in frame {
            prims.push(VectorPrimitive::Rect { x, y, w, h, color: layout.fg });
        }
    }

    let hm = layout.h_margin();
    let vm = layout.v_margin();
    for r in 0..layout.grid.height() {
        let y0 = layout.px(vm + r as u32 * layout.row_height);
        let y1 = layout.px(vm + (r as u32 + 1) * layout.row_height);
        let row = layout.grid.row(r);
        let mut c = 0;
        while c < row.len() {
            if row[c] == Color::Dark {
                let start = c;
                while c < row.len() && row[c] == Color::Dark {
                    c += 1;
                }
                let x0 = layout.px(hm + start as u32);
                let x1 = layout.px(hm + c as u32);
                prims.push(VectorPrimitive::Rect {
                    x: x0,
                    y: y0,
                    w: x1 - x0,
                    h: y1 - y0,
                    color: layout.fg,
                });
            } else {
                c += 1;
            }
        }
    }

    if let Some(text) = &layout.hrt {
        prims.push(VectorPrimitive::Text {
            x: 0,
            y: layout.symbol_height_px(),
            height: layout.text_band_px(),
            content: text.clone(),
            color: layout.fg,
        });
    }

    VectorPage { width, height, primitives: prims }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::builder::SymbolOptions;
    use crate::common::grid::{Color, ModuleGrid};
    use crate::layout::{compose, BLACK, WHITE};
    use crate::registry::{Charset, ChecksumKind, LengthRule, SymbologySpec};

    fn tiny_spec(two_dimensional: bool, min_qz: u32) -> SymbologySpec {
        SymbologySpec {
            id: 0,
            name: "Tiny",
            charset: Charset::Binary,
            length: LengthRule::UpTo(10),
            checksum: ChecksumKind::None,
            two_dimensional,
            min_quiet_zone: min_qz,
            default_height: 2,
        }
    }

    fn checker_grid() -> ModuleGrid {
        let mut grid = ModuleGrid::new(2, 2);
        grid.set(0, 0, Color::Dark);
        grid.set(1, 1, Color::Dark);
        grid
    }

    fn pixel(img: &RasterImage, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * img.width + x) * 3) as usize;
        [img.pixels[i], img.pixels[i + 1], img.pixels[i + 2]]
    }

    #[test]
    fn test_raster_dimensions() {
        let (layout, _) =
            compose(checker_grid(), &tiny_spec(true, 1), &SymbolOptions::default(), None);
        let img = render_raster(&layout);
        assert_eq!((img.width, img.height), (4, 4));
        assert_eq!(img.pixels.len(), 4 * 4 * 3);
    }

    #[test]
    fn test_raster_classification() {
        let opts = SymbolOptions { border: Some(1), ..SymbolOptions::default() };
        let (layout, _) = compose(checker_grid(), &tiny_spec(true, 1), &opts, None);
        let img = render_raster(&layout);
        assert_eq!((img.width, img.height), (6, 6));
        // Border corner is foreground
        assert_eq!(pixel(&img, 0, 0), [0, 0, 0]);
        // Quiet zone is background
        assert_eq!(pixel(&img, 1, 1), [255, 255, 255]);
        // Dark module at grid (0, 0)
        assert_eq!(pixel(&img, 2, 2), [0, 0, 0]);
        // Light module at grid (0, 1)
        assert_eq!(pixel(&img, 3, 2), [255, 255, 255]);
        assert_eq!(pixel(&img, 3, 3), [0, 0, 0]);
    }

    #[test]
    fn test_raster_colors_pass_through() {
        use crate::layout::Rgb;
        let opts = SymbolOptions {
            fg: Rgb(0x12, 0x34, 0x56),
            bg: Rgb(0xfe, 0xdc, 0xba),
            ..SymbolOptions::default()
        };
        let (layout, _) = compose(checker_grid(), &tiny_spec(true, 0), &opts, None);
        let img = render_raster(&layout);
        assert_eq!(pixel(&img, 0, 0), [0x12, 0x34, 0x56]);
        assert_eq!(pixel(&img, 1, 0), [0xfe, 0xdc, 0xba]);
    }

    #[test]
    fn test_raster_linear_bar_height() {
        // 1-row grid stretched to 2 modules, no vertical quiet zone
        let mut grid = ModuleGrid::new(3, 1);
        grid.set(0, 1, Color::Dark);
        let opts = SymbolOptions { quiet_zone: Some(0), ..SymbolOptions::default() };
        let (layout, _) = compose(grid, &tiny_spec(false, 0), &opts, None);
        let img = render_raster(&layout);
        assert_eq!((img.width, img.height), (3, 2));
        for y in 0..2 {
            assert_eq!(pixel(&img, 0, y), [255, 255, 255]);
            assert_eq!(pixel(&img, 1, y), [0, 0, 0]);
            assert_eq!(pixel(&img, 2, y), [255, 255, 255]);
        }
    }

    #[test]
    fn test_raster_text_band_is_background() {
        let mut grid = ModuleGrid::new(12, 1);
        grid.set(0, 0, Color::Dark);
        let opts =
            SymbolOptions { quiet_zone: Some(0), show_hrt: true, ..SymbolOptions::default() };
        let (layout, _) = compose(grid, &tiny_spec(false, 0), &opts, Some("HI".into()));
        let img = render_raster(&layout);
        assert_eq!(img.height, layout.symbol_height_px() + layout.text_band_px());
        let y = img.height - 1;
        for x in 0..img.width {
            assert_eq!(pixel(&img, x, y), [255, 255, 255]);
        }
    }

    #[test]
    fn test_vector_run_length() {
        // Row #.## -> two rects, widths 1 and 2
        let mut grid = ModuleGrid::new(4, 1);
        grid.set(0, 0, Color::Dark);
        grid.set(0, 2, Color::Dark);
        grid.set(0, 3, Color::Dark);
        let opts = SymbolOptions { quiet_zone: Some(0), ..SymbolOptions::default() };
        let (layout, _) = compose(grid, &tiny_spec(false, 0), &opts, None);
        let page = render_vector(&layout);
        let rects: Vec<_> = page
            .primitives
            .iter()
            .filter(|p| matches!(p, VectorPrimitive::Rect { color, .. } if *color == BLACK))
            .collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(*rects[0], VectorPrimitive::Rect { x: 0, y: 0, w: 1, h: 2, color: BLACK });
        assert_eq!(*rects[1], VectorPrimitive::Rect { x: 2, y: 0, w: 2, h: 2, color: BLACK });
    }

    #[test]
    fn test_vector_background_first() {
        let (layout, _) =
            compose(checker_grid(), &tiny_spec(true, 1), &SymbolOptions::default(), None);
        let page = render_vector(&layout);
        assert_eq!(
            page.primitives[0],
            VectorPrimitive::Rect { x: 0, y: 0, w: 4, h: 4, color: WHITE }
        );
    }

    #[test]
    fn test_vector_text_primitive() {
        let mut grid = ModuleGrid::new(12, 1);
        grid.set(0, 0, Color::Dark);
        let opts =
            SymbolOptions { quiet_zone: Some(0), show_hrt: true, ..SymbolOptions::default() };
        let (layout, _) = compose(grid, &tiny_spec(false, 0), &opts, Some("HI".into()));
        let page = render_vector(&layout);
        let text =
            page.primitives.iter().find(|p| matches!(p, VectorPrimitive::Text { .. })).unwrap();
        match text {
            VectorPrimitive::Text { y, height, content, .. } => {
                assert_eq!(*y, layout.symbol_height_px());
                assert_eq!(*height, layout.text_band_px());
                assert_eq!(content, "HI");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_raster_vector_agree_on_dimensions() {
        let opts = SymbolOptions { scale: 2.5, border: Some(1), ..SymbolOptions::default() };
        let (layout, _) = compose(checker_grid(), &tiny_spec(true, 2), &opts, None);
        let img = render_raster(&layout);
        let page = render_vector(&layout);
        assert_eq!((img.width, img.height), (page.width, page.height));
    }
}
