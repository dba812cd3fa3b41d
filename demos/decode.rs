use std::env;
use std::fs::File;

use cheatkit::Result;
use cheatkit::formats::listing::Listing;
use cheatkit::formats::pnach::PatchSet;
use cheatkit::keys::KeySet;

const ARMAX_LISTING: &str = "\
Infinite Health
GMZE-T6VW-H2W3W
VED7-KAJZ-AMKYH
";

const AR2_LISTING: &str = "\
Enable Code
0E3C7DF2 1853E59E
Max Money
DE8CC254 BCA99A82
";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut keys = KeySet::new();
    if let Some(path) = env::args().nth(1) {
        keys.load(File::open(path)?)?;
    }

    let armax = Listing::parse_armax(ARMAX_LISTING).decode_armax(&keys);
    if let Some(e) = &armax.error {
        eprintln!("armax decode failed: {e}");
    }
    if let Some(game) = armax.game {
        println!("game id: {:04X}, region: {}", game.game_id, game.region);
    }
    print!("{}", PatchSet::new(armax.cheats).with_comment("ARMAX"));

    let ar2 = Listing::parse_ar2(AR2_LISTING).decode_ar2(&keys);
    print!("{}", PatchSet::new(ar2.cheats).with_comment("AR2"));

    Ok(())
}
