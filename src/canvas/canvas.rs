use image::{ImageBuffer, ImageFormat, Rgb};
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::canvas::{Color, ScoreTable};
use crate::error::{PixelwarError, Result};

/// Fill used for unclaimed cells in exported images
const UNSET_RGB: [u8; 3] = [255, 255, 255];

/// Fixed-size grid of cells, each either unset or claimed by a color
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    cells: Vec<Option<Color>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![None; width * height],
            width,
            height,
        }
    }

    /// Rebuild from row-major `rows[y][x]`, rejecting anything that does not
    /// match the expected dimensions.
    pub fn from_rows(rows: Vec<Vec<Option<Color>>>, width: usize, height: usize) -> Result<Self> {
        if rows.len() != height {
            return Err(PixelwarError::InvalidSnapshot(format!(
                "expected {} rows, got {}",
                height,
                rows.len()
            )));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(PixelwarError::InvalidSnapshot(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            if let Some(bad) = row.iter().flatten().find(|color| color.rgb().is_none()) {
                return Err(PixelwarError::InvalidSnapshot(format!(
                    "row {} holds invalid color {}",
                    y, bad
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Map client coordinates onto the grid
    pub fn locate(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Color> {
        self.cells.get(y * self.width + x).and_then(Option::as_ref)
    }

    /// Claim a cell, returning whoever held it before
    pub fn set(&mut self, x: usize, y: usize, color: Color) -> Option<Color> {
        let index = y * self.width + x;
        self.cells[index].replace(color)
    }

    pub fn unset_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Cells held per color, counted from the grid
    pub fn tally(&self) -> ScoreTable {
        let mut counts = BTreeMap::new();
        for color in self.cells.iter().flatten() {
            *counts.entry(color.clone()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn rows(&self) -> Vec<Vec<Option<Color>>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Export canvas to PNG bytes, one pixel per cell
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
                let rgb = self
                    .get(x as usize, y as usize)
                    .and_then(Color::rgb)
                    .unwrap_or(UNSET_RGB);
                Rgb(rgb)
            });

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
