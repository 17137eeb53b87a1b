use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("agnoc {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!(
        "target: {}",
        option_env!("AGNOC_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("os: {}", std::env::consts::OS);
    println!("arch: {}", std::env::consts::ARCH);
    println!("opcodes: {}", agnoc_protocol::OpName::ALL.len());
    println!(
        "max_body_size: {}",
        agnoc_frame::MAX_BODY_SIZE
    );
    println!("features: session={}, cli=true", cfg!(feature = "session"));

    Ok(SUCCESS)
}
