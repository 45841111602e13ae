//! Reading input files from disk and handing them to the parsers.
//!
//! Every loader keeps the text it parsed as a [`SourceFile`] so later
//! diagnostics can point back into it.

use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use zip::ZipArchive;

use pinlabel_parser::{
    arduino::{ArduinoVariant, VariantBuilder},
    breadboard::{Artwork, parse_artwork},
    fzp::{PartFile, parse_part},
    pin_table::{PinTable, parse_pin_table},
    pinout::{PinoutTable, parse_pinout},
};

use crate::error::{InputKind, PinlabelError, SourceFile, SourcedDiagnostic};

const BREADBOARD_PREFIX: &str = "svg.breadboard";

/// A part file and its breadboard artwork.
#[derive(Debug)]
pub struct LoadedBoard {
    path: PathBuf,
    part: PartFile,
    part_src: SourceFile,
    artwork: Artwork,
    artwork_src: SourceFile,
}

impl LoadedBoard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn part(&self) -> &PartFile {
        &self.part
    }

    pub fn part_src(&self) -> &SourceFile {
        &self.part_src
    }

    pub fn artwork(&self) -> &Artwork {
        &self.artwork
    }

    pub fn artwork_src(&self) -> &SourceFile {
        &self.artwork_src
    }

    /// The part title, else the file stem.
    pub fn name(&self) -> String {
        match self.part.title() {
            Some(title) => title.to_string(),
            None => self
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
impl LoadedBoard {
    pub(crate) fn from_text(part: &str, artwork: &str) -> Self {
        Self {
            path: PathBuf::from("test.fzp"),
            part: parse_part(part).unwrap(),
            part_src: SourceFile::new("test.fzp", part),
            artwork: parse_artwork(artwork).unwrap(),
            artwork_src: SourceFile::new("test_bb.svg", artwork),
        }
    }
}

/// Loads a `.fzpz` archive or a `.fzp` part with the artwork beside it.
///
/// # Errors
///
/// [`PinlabelError::Input`] when a file cannot be read or the artwork cannot
/// be found, [`PinlabelError::Parse`] when either file is malformed.
pub fn load_board(path: &Path) -> Result<LoadedBoard, PinlabelError> {
    info!(path:? = path; "Loading board");
    let is_archive = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fzpz"));
    let board = if is_archive {
        load_fzpz(path)?
    } else {
        load_fzp(path)?
    };
    debug!(
        connectors = board.part.connectors().len(),
        pads = board.artwork.pads().len();
        "Board loaded"
    );
    Ok(board)
}

fn load_fzpz(path: &Path) -> Result<LoadedBoard, PinlabelError> {
    let board_err = |err: io::Error| PinlabelError::new_input_error(InputKind::Board, path, err);

    let file = File::open(path).map_err(board_err)?;
    let mut archive = ZipArchive::new(file).map_err(|err| board_err(io::Error::other(err)))?;
    let entries: Vec<String> = archive.file_names().map(str::to_string).collect();

    let part_entry = entries
        .iter()
        .find(|name| has_extension(name, "fzp"))
        .ok_or_else(|| board_err(not_found("archive contains no .fzp part file")))?;
    let part_text = read_entry(&mut archive, part_entry).map_err(board_err)?;
    let part_src = SourceFile::new(format!("{}:{part_entry}", path.display()), part_text);
    let part = parse_part(part_src.text())
        .map_err(|err| PinlabelError::new_parse_error(InputKind::Board, err, part_src.clone()))?;

    let artwork_name = artwork_entry(&entries, part.breadboard_image()).ok_or_else(|| {
        PinlabelError::new_input_error(
            InputKind::Artwork,
            path,
            not_found("archive contains no breadboard SVG"),
        )
    })?;
    debug!(part = part_entry.as_str(), artwork = artwork_name; "Archive entries selected");
    let artwork_text = read_entry(&mut archive, artwork_name)
        .map_err(|err| PinlabelError::new_input_error(InputKind::Artwork, path, err))?;
    let artwork_src = SourceFile::new(format!("{}:{artwork_name}", path.display()), artwork_text);
    let artwork = parse_artwork(artwork_src.text()).map_err(|err| {
        PinlabelError::new_parse_error(InputKind::Artwork, err, artwork_src.clone())
    })?;

    Ok(LoadedBoard {
        path: path.to_path_buf(),
        part,
        part_src,
        artwork,
        artwork_src,
    })
}

fn load_fzp(path: &Path) -> Result<LoadedBoard, PinlabelError> {
    let part_src = read_source(InputKind::Board, path)?;
    let part = parse_part(part_src.text())
        .map_err(|err| PinlabelError::new_parse_error(InputKind::Board, err, part_src.clone()))?;

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let artwork_file = artwork_path(dir, part.breadboard_image()).ok_or_else(|| {
        PinlabelError::new_input_error(
            InputKind::Artwork,
            dir,
            not_found("no breadboard SVG found next to the part file"),
        )
    })?;
    debug!(artwork:? = artwork_file; "Breadboard artwork located");
    let artwork_src = read_source(InputKind::Artwork, &artwork_file)?;
    let artwork = parse_artwork(artwork_src.text()).map_err(|err| {
        PinlabelError::new_parse_error(InputKind::Artwork, err, artwork_src.clone())
    })?;

    Ok(LoadedBoard {
        path: path.to_path_buf(),
        part,
        part_src,
        artwork,
        artwork_src,
    })
}

/// Picks the breadboard entry of an archive.
fn artwork_entry<'a>(entries: &'a [String], image: Option<&str>) -> Option<&'a str> {
    let named = image.and_then(|image| {
        let base = base_name(image);
        let prefixed = format!("{BREADBOARD_PREFIX}.{base}");
        entries
            .iter()
            .find(|entry| {
                let entry = base_name(entry);
                entry == prefixed || entry == base
            })
            .map(String::as_str)
    });
    named.or_else(|| {
        entries
            .iter()
            .find(|entry| is_breadboard_svg(base_name(entry)))
            .map(String::as_str)
    })
}

/// Finds the breadboard SVG of an unpacked part in `dir`.
fn artwork_path(dir: &Path, image: Option<&str>) -> Option<PathBuf> {
    if let Some(image) = image {
        let base = base_name(image);
        let candidates = [
            dir.join(format!("{BREADBOARD_PREFIX}.{base}")),
            dir.join(base),
            dir.join("breadboard").join(base),
            dir.join(image),
        ];
        if let Some(found) = candidates.into_iter().find(|candidate| candidate.is_file()) {
            return Some(found);
        }
        warn!(image; "Breadboard image named by the part not found, scanning directory");
    }

    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(OsStr::to_str)
                .is_some_and(is_breadboard_svg)
        })
        .collect();
    found.sort();
    found.into_iter().next()
}

fn is_breadboard_svg(name: &str) -> bool {
    name.starts_with(BREADBOARD_PREFIX) && has_extension(name, "svg")
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> io::Result<String> {
    let mut entry = archive.by_name(name).map_err(io::Error::other)?;
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}

fn not_found(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, message.to_string())
}

/// Reads a whole file as the given input kind.
///
/// # Errors
///
/// [`PinlabelError::Input`] if the file cannot be read.
pub fn read_source(kind: InputKind, path: &Path) -> Result<SourceFile, PinlabelError> {
    let text = fs::read_to_string(path)
        .map_err(|err| PinlabelError::new_input_error(kind, path, err))?;
    Ok(SourceFile::new(path.display().to_string(), text))
}

/// Loads a CircuitPython `pins.c`.
///
/// # Errors
///
/// Fails if the file cannot be read or has no pin entries.
pub fn load_pin_table(path: &Path) -> Result<PinTable, PinlabelError> {
    info!(path:? = path; "Loading pin definitions");
    let src = read_source(InputKind::PinDefinitions, path)?;
    let table = parse_pin_table(src.text())
        .map_err(|err| PinlabelError::new_parse_error(InputKind::PinDefinitions, err, src.clone()))?;
    debug!(entries = table.len(); "Pin definitions loaded");
    Ok(table)
}

/// Loads every `*.h` header of an Arduino variant directory, in name order.
///
/// Returns the variant together with its warnings, each tied to the header
/// it came from.
///
/// # Errors
///
/// Fails if the directory or a header cannot be read, or no header defines
/// a pin constant.
pub fn load_variant(dir: &Path) -> Result<(ArduinoVariant, Vec<SourcedDiagnostic>), PinlabelError> {
    info!(dir:? = dir; "Loading Arduino variant");
    let variant_err = |err: io::Error| PinlabelError::new_input_error(InputKind::ArduinoVariant, dir, err);

    let mut headers: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(variant_err)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(variant_err)?
        .into_iter()
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "h"))
        .collect();
    headers.sort();

    let sources = headers
        .iter()
        .map(|header| read_source(InputKind::ArduinoVariant, header))
        .collect::<Result<Vec<_>, _>>()?;

    let builder = sources.iter().fold(VariantBuilder::new(), |builder, src| {
        builder.add_header(src.name(), src.text())
    });
    let variant = builder.build().map_err(|err| {
        PinlabelError::new_parse_error(
            InputKind::ArduinoVariant,
            err,
            SourceFile::new(dir.display().to_string(), ""),
        )
    })?;

    let warnings = variant
        .warnings()
        .iter()
        .filter_map(|warning| {
            let src = sources.iter().find(|src| src.name() == warning.header())?;
            Some(SourcedDiagnostic::new(warning.diagnostic().clone(), src.clone()))
        })
        .collect();
    debug!(headers = sources.len(), pins = variant.pins().len(); "Arduino variant loaded");
    Ok((variant, warnings))
}

/// Loads the pinout CSV. The source is returned for resolution diagnostics.
///
/// # Errors
///
/// Fails if the file cannot be read or is not a usable pinout table.
pub fn load_pinout(path: &Path) -> Result<(PinoutTable, SourceFile), PinlabelError> {
    info!(path:? = path; "Loading pinout table");
    let src = read_source(InputKind::Pinout, path)?;
    let table = parse_pinout(src.text())
        .map_err(|err| PinlabelError::new_parse_error(InputKind::Pinout, err, src.clone()))?;
    debug!(rows = table.rows().len(), key_column = table.key_column(); "Pinout table loaded");
    Ok((table, src))
}
