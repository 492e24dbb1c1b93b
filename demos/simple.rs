use maze_search::{Algorithm, MazeGrid, Searcher, Status};

// Solves a small maze with BFS and prints the marked grid:
// S marks the start, T the target, # obstacles, * the route and
// x/o the closed and frontier cells the search left behind.
fn main() {
    let mut grid = MazeGrid::from_ascii(
        "S...#...
         .##.#.#.
         .#..#.#.
         .#.##.#.
         .#....#T
         .######.
         ........",
    )
    .unwrap();
    let mut searcher = Searcher::new(Algorithm::Bfs);
    match searcher.solve(&mut grid).unwrap() {
        Status::Found => {
            let path = searcher.path().unwrap();
            println!("A route of {} steps has been found:", path.len() - 1);
            println!("{grid}");
        }
        _ => println!("No route exists:\n{grid}"),
    }
}
