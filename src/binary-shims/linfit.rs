fn main() { linfit_tasks::entry_points::linfit() }
