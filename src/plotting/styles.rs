use plotters::style::{RGBAColor, RGBColor};

use crate::types::Category;

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Main sales line
    pub line_color: RGBColor,
    /// Soft halo drawn under the sales line
    pub line_glow_color: RGBColor,
    /// One series color per category, in canonical order
    pub category_colors: [RGBColor; 3],
    /// Cool endpoint of the diverging correlation colormap
    pub heat_negative: RGBColor,
    /// Midpoint of the colormap, close to the chart background
    pub heat_neutral: RGBColor,
    /// Warm endpoint of the diverging correlation colormap
    pub heat_positive: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            line_color: RGBColor(135, 206, 250),
            line_glow_color: RGBColor(100, 149, 237),
            category_colors: [
                RGBColor(100, 149, 237),
                RGBColor(60, 179, 113),
                RGBColor(205, 92, 92),
            ],
            heat_negative: RGBColor(99, 110, 250),
            heat_neutral: RGBColor(45, 48, 60),
            heat_positive: RGBColor(239, 85, 59),
        }
    }
}

impl ChartTheme {
    /// Series color for a category.
    pub fn category_color(&self, category: Category) -> RGBColor {
        match category {
            Category::A => self.category_colors[0],
            Category::B => self.category_colors[1],
            Category::C => self.category_colors[2],
        }
    }

    /// Diverging fill for a correlation coefficient in [-1, 1]: negative
    /// values blend toward the cool endpoint, positive toward the warm one.
    pub fn correlation_color(&self, r: f64) -> RGBColor {
        let t = r.clamp(-1.0, 1.0);
        let target = if t < 0.0 {
            self.heat_negative
        } else {
            self.heat_positive
        };
        blend(self.heat_neutral, target, t.abs())
    }
}

fn blend(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Chart style configuration
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Scatter point radius in pixels
    pub point_radius: i32,
    /// Half-width of a category bar, in axis units
    pub bar_half_width: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            margin: 10,
            label_area_size: 50,
            point_radius: 4,
            bar_half_width: 0.4,
        }
    }
}
