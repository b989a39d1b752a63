fn main() {
    rheo_pipeline::cli::run();
}
