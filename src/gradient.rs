use ratatui::style::Color;

/// Weakest band position still gets 30% saturation; rank position is
/// normalized linearly into [0.3, 1.0] across the five-rank band.
pub const GRADIENT_FLOOR: f64 = 0.3;

// Nine-stop ColorBrewer sequential scales, light to dark.
const GREENS: [(u8, u8, u8); 9] = [
    (247, 252, 245),
    (229, 245, 224),
    (199, 233, 192),
    (161, 217, 155),
    (116, 196, 118),
    (65, 171, 93),
    (35, 139, 69),
    (0, 109, 44),
    (0, 68, 27),
];

const REDS: [(u8, u8, u8); 9] = [
    (255, 245, 240),
    (254, 224, 210),
    (252, 187, 161),
    (252, 146, 114),
    (251, 106, 74),
    (239, 59, 44),
    (203, 24, 29),
    (165, 15, 21),
    (103, 0, 13),
];

/// Gradient position for a strength: rank 1 maps to 1.0, rank 5 to the
/// floor.
pub fn strength_norm(rank: usize) -> f64 {
    1.0 - (rank as f64 - 1.0) * (1.0 - GRADIENT_FLOOR) / 4.0
}

/// Gradient position for a weakness: the worst rank in the table maps to
/// 1.0, rank total-4 to the floor. Positions outside the band clamp at
/// sampling time.
pub fn weakness_norm(rank: usize, total_teams: usize) -> f64 {
    let rank_pos = rank as f64 - (total_teams as f64 - 5.0);
    GRADIENT_FLOOR + (rank_pos - 1.0) * (1.0 - GRADIENT_FLOOR) / 4.0
}

pub fn strength_color(rank: usize) -> Color {
    sample(&GREENS, strength_norm(rank))
}

pub fn weakness_color(rank: usize, total_teams: usize) -> Color {
    sample(&REDS, weakness_norm(rank, total_teams))
}

fn sample(stops: &[(u8, u8, u8); 9], norm: f64) -> Color {
    let t = norm.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
    let lo = t.floor() as usize;
    let hi = (lo + 1).min(stops.len() - 1);
    let frac = t - lo as f64;
    let (r0, g0, b0) = stops[lo];
    let (r1, g1, b1) = stops[hi];
    let lerp =
        |a: u8, b: u8| -> u8 { (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8 };
    Color::Rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
