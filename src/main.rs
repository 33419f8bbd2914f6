fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the schematic editor
    circuit_sketcher::run_app()
}
