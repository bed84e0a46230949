//! Extracts a regular file out of a MINIX V3 filesystem image.

use minixfs::{FsContext, PartitionSelector};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::exit;
use utils::disk::get_disk_size;
use utils::util::ByteSize;

struct Args {
	verbose: bool,
	partition: Option<u8>,
	subpartition: Option<u8>,
	image: String,
	src_path: String,
	dst_path: Option<String>,
}

fn print_usage() {
	eprintln!("usage: minget [-v] [-p num [-s num]] imagefile srcpath [dstpath]");
	eprintln!("Options:");
	eprintln!("-v         Verbose mode");
	eprintln!("-p num     Select partition num (0..3)");
	eprintln!("-s num     Select subpartition num (0..3), requires -p");
}

fn parse_args() -> Args {
	let mut verbose = false;
	let mut partition = None;
	let mut subpartition = None;
	let mut positional = Vec::new();

	let mut it = env::args().skip(1);
	while let Some(arg) = it.next() {
		match arg.as_str() {
			"-v" => verbose = true,
			"-p" => {
				let n = it.next().unwrap_or_else(|| {
					print_usage();
					exit(1);
				});
				partition = Some(n.parse::<u8>().unwrap_or_else(|_| {
					print_usage();
					exit(1);
				}));
			}
			"-s" => {
				let n = it.next().unwrap_or_else(|| {
					print_usage();
					exit(1);
				});
				subpartition = Some(n.parse::<u8>().unwrap_or_else(|_| {
					print_usage();
					exit(1);
				}));
			}
			"-h" | "--help" => {
				print_usage();
				exit(0);
			}
			other => positional.push(other.to_string()),
		}
	}

	if subpartition.is_some() && partition.is_none() {
		eprintln!("minget: -s requires -p");
		print_usage();
		exit(1);
	}

	if positional.len() < 2 || positional.len() > 3 {
		print_usage();
		exit(1);
	}

	let image = positional[0].clone();
	let src_path = positional[1].clone();
	let dst_path = positional.get(2).cloned();

	Args { verbose, partition, subpartition, image, src_path, dst_path }
}

fn main() {
	let args = parse_args();

	let file = File::open(&args.image).unwrap_or_else(|e| {
		eprintln!("minget: cannot open {}: {e}", args.image);
		exit(1);
	});

	let selector = PartitionSelector { primary: args.partition, sub: args.subpartition };
	let mut fs = FsContext::open(file, selector).unwrap_or_else(|e| {
		eprintln!("minget: {e}");
		exit(1);
	});

	if args.verbose {
		if let Ok(sectors) = get_disk_size(Path::new(&args.image)) {
			eprintln!("Image size: {}", ByteSize::from_sectors_count(sectors));
		}
		let sb = &fs.superblock;
		eprintln!("Superblock Contents:");
		eprintln!("  ninodes     {}", sb.ninodes);
		eprintln!("  zone size   {}", sb.zonesize());
		eprintln!("  magic       0x{:04x}", sb.magic);
	}

	let (inum, target) = fs.resolve(Some(&args.src_path)).unwrap_or_else(|e| {
		eprintln!("minget: {e}");
		exit(1);
	});

	if args.verbose {
		eprintln!("Inode {inum}:");
		eprintln!("  mode  {}", target.permission_string());
		eprintln!("  size  {}", target.size);
	}

	if !target.is_regular() {
		eprintln!("minget: {}: not a regular file.", args.src_path);
		exit(1);
	}

	match args.dst_path {
		Some(dst) => {
			let mut out = File::create(&dst).unwrap_or_else(|e| {
				eprintln!("minget: cannot create {dst}: {e}");
				exit(1);
			});
			fs.extract_file(&target, &mut out).unwrap_or_else(|e| {
				eprintln!("minget: {e}");
				exit(1);
			});
		}
		None => {
			let mut out = io::stdout().lock();
			fs.extract_file(&target, &mut out).unwrap_or_else(|e| {
				eprintln!("minget: {e}");
				exit(1);
			});
			let _ = out.flush();
		}
	}
}
