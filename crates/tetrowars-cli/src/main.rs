mod command;
mod display;
mod source;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
