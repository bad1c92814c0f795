use elevation_profile_protocol::Coordinate;

/// Douglas–Peucker simplification of one line in the (distance, elevation)
/// plane.
///
/// The first and last coordinates are always kept and no dropped point lies
/// farther than `tolerance` from the simplified polyline. A non-positive or
/// NaN tolerance returns the line unchanged, as do lines of fewer than three
/// points.
///
/// Simplify each input line separately; running this across a gap would
/// merge two lines.
pub fn simplify_line(line: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    simplify_indices(line, tolerance)
        .into_iter()
        .map(|i| line[i])
        .collect()
}

/// Indices of the coordinates kept by [`simplify_line`], ascending.
pub fn simplify_indices(line: &[Coordinate], tolerance: f64) -> Vec<usize> {
    let n = line.len();
    if n < 3 || tolerance.is_nan() || tolerance <= 0.0 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Pending (first, last) spans.
    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let a = plane(&line[first]);
        let b = plane(&line[last]);

        let mut max_dist = 0.0;
        let mut max_idx = first;
        for (i, coordinate) in line.iter().enumerate().take(last).skip(first + 1) {
            let dist = segment_distance(plane(coordinate), a, b);
            if dist > max_dist {
                max_dist = dist;
                max_idx = i;
            }
        }

        if max_dist > tolerance {
            keep[max_idx] = true;
            stack.push((first, max_idx));
            stack.push((max_idx, last));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

fn plane(coordinate: &Coordinate) -> (f64, f64) {
    (coordinate.distance(), coordinate.elevation())
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let (cx, cy) = if len_sq == 0.0 {
        a
    } else {
        let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);
        (a.0 + t * dx, a.1 + t * dy)
    };
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
