use maze_search::{Algorithm, MazeGrid, Searcher, Status};

// Plays the role of the timer-driven UI: one expansion step per tick, with a
// redraw (here a println) after every few steps so the frontier (o) and
// closed set (x) are visible while the search is still running.
fn main() {
    let mut grid = MazeGrid::from_ascii(
        "S.......
         .######.
         ......#.
         #####.#.
         ......#.
         .######.
         .......T",
    )
    .unwrap();
    let mut searcher = Searcher::new(Algorithm::Dfs);
    searcher.start_run(&grid).unwrap();

    let mut ticks = 0;
    loop {
        let status = searcher.step(&mut grid);
        ticks += 1;
        if ticks % 8 == 0 || status != Status::Continuing {
            println!("after {ticks} steps:\n{grid}");
        }
        match status {
            Status::Continuing => {}
            Status::Found => {
                searcher.mark_route(&mut grid);
                println!("target found:\n{grid}");
                break;
            }
            Status::Exhausted => {
                println!("no route exists");
                break;
            }
        }
    }
}
