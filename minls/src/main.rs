//! Lists the contents of a directory (or a single file's entry) inside a
//! MINIX V3 filesystem image.

use minixfs::{FsContext, PartitionSelector};
use std::env;
use std::fs::File;
use std::path::Path;
use std::process::exit;
use utils::disk::get_disk_size;
use utils::util::ByteSize;

/// Parsed command line arguments.
struct Args {
	verbose: bool,
	partition: Option<u8>,
	subpartition: Option<u8>,
	image: String,
	path: Option<String>,
}

fn print_usage() {
	eprintln!("usage: minls [-v] [-p num [-s num]] imagefile [path]");
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
		eprintln!("minls: -s requires -p");
		print_usage();
		exit(1);
	}

	if positional.is_empty() || positional.len() > 2 {
		print_usage();
		exit(1);
	}

	let image = positional[0].clone();
	let path = positional.get(1).cloned();

	Args { verbose, partition, subpartition, image, path }
}

fn main() {
	let args = parse_args();

	let file = File::open(&args.image).unwrap_or_else(|e| {
		eprintln!("minls: cannot open {}: {e}", args.image);
		exit(1);
	});

	let selector = PartitionSelector { primary: args.partition, sub: args.subpartition };
	let mut fs = FsContext::open(file, selector).unwrap_or_else(|e| {
		eprintln!("minls: {e}");
		exit(1);
	});

	if args.verbose {
		if let Ok(sectors) = get_disk_size(Path::new(&args.image)) {
			eprintln!("Image size: {}", ByteSize::from_sectors_count(sectors));
		}
		let sb = &fs.superblock;
		eprintln!("Superblock Contents:");
		eprintln!("  ninodes     {}", sb.ninodes);
		eprintln!("  i_blocks    {}", sb.i_blocks);
		eprintln!("  z_blocks    {}", sb.z_blocks);
		eprintln!("  firstdata   {}", sb.firstdata);
		eprintln!("  log_zone_size {} (zone size {})", sb.log_zone_size, sb.zonesize());
		eprintln!("  max_file    {}", sb.max_file);
		eprintln!("  zones       {}", sb.zones);
		eprintln!("  magic       0x{:04x}", sb.magic);
		eprintln!("  blocksize   {}", sb.blocksize);
		eprintln!("  subversion  {}", sb.subversion);
	}

	let (inum, target) = fs.resolve(args.path.as_deref()).unwrap_or_else(|e| {
		eprintln!("minls: {e}");
		exit(1);
	});

	if args.verbose {
		eprintln!("Inode {inum}:");
		eprintln!("  mode  {}", target.permission_string());
		eprintln!("  links {}", target.links);
		eprintln!("  size  {}", target.size);
	}

	if target.is_dir() {
		let canonical = minixfs::path::canonicalize(args.path.as_deref());
		println!("{canonical}:");
		let mut lines = Vec::new();
		fs.list_dir(&target, |entry| {
			lines.push((entry.inode, entry.name));
		})
		.unwrap_or_else(|e| {
			eprintln!("minls: {e}");
			exit(1);
		});
		for (inum, name) in lines {
			let inode = fs.fetch_inode(inum).unwrap_or_else(|e| {
				eprintln!("minls: {e}");
				exit(1);
			});
			println!("{}{:>10} {}", inode.permission_string(), inode.size, name);
		}
	} else {
		let canonical = minixfs::path::canonicalize(args.path.as_deref());
		let basename = canonical.rsplit('/').next().unwrap_or(&canonical);
		println!("{}{:>10} {}", target.permission_string(), target.size, basename);
	}
}
