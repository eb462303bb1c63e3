extern crate clap;
extern crate env_logger;
extern crate ipv4hdr;

use std::process;

use ipv4hdr::core::repr::{
    Icmpv4Code,
    Icmpv4Header,
    Icmpv4Type,
    Ipv4Address,
    Ipv4Header,
    Ipv4Protocol,
};
use ipv4hdr::core::services::icmpv4;

fn print_packet(title: &str, buffer: &[u8]) {
    println!("{} ({} bytes):", title, buffer.len());
    for line in buffer.chunks(16) {
        let hex: Vec<_> = line.iter().map(|byte| format!("{:02x}", byte)).collect();
        println!("    {}", hex.join(" "));
    }
}

fn addr_arg(matches: &clap::ArgMatches, name: &str) -> Ipv4Address {
    let value = matches.value_of(name).unwrap();
    match value.parse() {
        Ok(addr) => addr,
        Err(err) => {
            eprintln!("Bad address {} for --{}: {}", value, name, err);
            process::exit(1);
        }
    }
}

/// Builds an ICMP echo request and rewrites it into its reply.
fn main() {
    env_logger::init();

    let matches = clap::App::new("echo_reply")
        .about("Builds an ICMP echo request and turns it into its reply")
        .arg(
            clap::Arg::with_name("src")
                .long("src")
                .value_name("IPV4")
                .help("Source address of the request")
                .default_value("10.0.0.1")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("dst")
                .long("dst")
                .value_name("IPV4")
                .help("Destination address of the request")
                .default_value("10.0.0.102")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("payload")
                .long("payload")
                .value_name("TEXT")
                .help("Echo data following the ICMP header")
                .default_value("hello")
                .takes_value(true),
        )
        .get_matches();

    let request = Icmpv4Header {
        ipv4: Ipv4Header {
            protocol: Ipv4Protocol::Icmp,
            ipid: 1,
            src_addr: addr_arg(&matches, "src"),
            dst_addr: addr_arg(&matches, "dst"),
        },
        type_of: Icmpv4Type::EchoRequest,
        code: Icmpv4Code::NoCode,
    };

    let mut buffer = vec![0; Icmpv4Header::LEN];
    buffer.extend_from_slice(matches.value_of("payload").unwrap().as_bytes());

    if let Err(err) = request.marshal(&mut buffer[..]) {
        eprintln!("Unable to build request: {}", err);
        process::exit(1);
    }
    println!("{}", request);
    print_packet("Request", &buffer);

    match icmpv4::reply_in_place(&mut buffer[..]) {
        Ok(reply) => {
            println!("{}", reply);
            print_packet("Reply", &buffer);
        }
        Err(err) => {
            eprintln!("Unable to reply: {}", err);
            process::exit(1);
        }
    }
}
