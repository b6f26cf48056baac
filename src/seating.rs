//! Проекция матрицы мест сеанса: полная сетка R x P с флагами занятости.

/// Строит сетку `grid[row][place]` (индексация с нуля) по списку занятых
/// координат. Координаты вне текущих размеров зала игнорируются - такие
/// места остаются в истории заказов, но в сетке не показываются.
pub fn build_grid(rows: i32, places: i32, booked: &[(i32, i32)]) -> Vec<Vec<bool>> {
    let mut grid = vec![vec![false; places.max(0) as usize]; rows.max(0) as usize];
    for &(row, place) in booked {
        if row >= 1 && row <= rows && place >= 1 && place <= places {
            grid[(row - 1) as usize][(place - 1) as usize] = true;
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_complete_and_initially_free() {
        let grid = build_grid(5, 8, &[]);
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|row| row.len() == 8));
        assert!(grid.iter().flatten().all(|booked| !booked));
    }

    #[test]
    fn booked_coordinates_are_marked() {
        let grid = build_grid(3, 3, &[(1, 1), (3, 2)]);
        assert!(grid[0][0]);
        assert!(grid[2][1]);
        assert_eq!(grid.iter().flatten().filter(|b| **b).count(), 2);
    }

    #[test]
    fn out_of_range_bookings_are_not_projected() {
        // зал ужали после продаж: историческое место за пределами сетки
        let grid = build_grid(2, 2, &[(5, 1), (1, 9), (2, 2)]);
        assert_eq!(grid.len(), 2);
        assert!(grid[1][1]);
        assert_eq!(grid.iter().flatten().filter(|b| **b).count(), 1);
    }
}
