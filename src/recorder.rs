// .cvf frame writer/reader and manifest.json handling.
// One directory per run: manifest.json plus frame_NNNNNN.cvf files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::state::FrameSnapshot;

const CVF_MAGIC: &[u8; 4] = b"CVF\0";
const CVF_VERSION: u32 = 1;
const FIELD_NAME_ENTRY_SIZE: usize = 16;

#[derive(Debug, Clone)]
pub struct CvfFrame {
    pub step: u64,
    pub time: f64,
    pub fields: Vec<(String, Vec<f64>)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridInfo {
    pub nx: usize,
    pub ny: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeInfo {
    pub dt: f64,
    pub output_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    pub step: u64,
    pub time: f64,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub model: String,
    pub grid: GridInfo,
    pub time: TimeInfo,
    pub fields: Vec<String>,
    pub frames: Vec<FrameEntry>,
}

/// Streaming run recorder. Frames land on disk as they arrive;
/// `finish` writes the manifest that makes the directory readable.
#[derive(Debug)]
pub struct CvfWriter {
    dir: PathBuf,
    manifest: Manifest,
}

impl CvfWriter {
    pub fn create(
        dir: impl AsRef<Path>,
        model: &str,
        nx: usize,
        ny: usize,
        dt: f64,
        output_interval: u64,
        fields: Vec<String>,
    ) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        for name in &fields {
            if name.len() >= FIELD_NAME_ENTRY_SIZE {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("field name too long: {}", name),
                ));
            }
        }
        Ok(Self {
            dir,
            manifest: Manifest {
                version: CVF_VERSION,
                model: model.to_string(),
                grid: GridInfo { nx, ny },
                time: TimeInfo { dt, output_interval },
                fields,
                frames: Vec::new(),
            },
        })
    }

    /// Append one frame. The snapshot's field set must match the manifest:
    /// "u" always, "v" when the manifest declared it.
    pub fn write_frame(&mut self, snap: &FrameSnapshot) -> io::Result<()> {
        let grid_size = self.manifest.grid.nx * self.manifest.grid.ny;
        if snap.u.len() != grid_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame has {} samples, manifest grid needs {}", snap.u.len(), grid_size),
            ));
        }
        let want_v = self.manifest.fields.iter().any(|f| f == "v");
        if want_v != snap.v.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "frame field set does not match the manifest",
            ));
        }

        let file_name = format!("frame_{:06}.cvf", self.manifest.frames.len());
        let mut file = fs::File::create(self.dir.join(&file_name))?;

        file.write_all(CVF_MAGIC)?;
        file.write_all(&CVF_VERSION.to_le_bytes())?;
        file.write_all(&(self.manifest.grid.nx as u32).to_le_bytes())?;
        file.write_all(&(self.manifest.grid.ny as u32).to_le_bytes())?;
        file.write_all(&(self.manifest.fields.len() as u32).to_le_bytes())?;
        file.write_all(&snap.step.to_le_bytes())?;
        file.write_all(&snap.time.to_le_bytes())?;

        for name in &self.manifest.fields {
            let mut entry = [0u8; FIELD_NAME_ENTRY_SIZE];
            entry[0] = name.len() as u8;
            entry[1..1 + name.len()].copy_from_slice(name.as_bytes());
            file.write_all(&entry)?;
        }
        for name in &self.manifest.fields {
            let data: &[f64] = match name.as_str() {
                "u" => &snap.u,
                "v" => snap.v.as_deref().unwrap_or(&[]),
                other => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unknown field in manifest: {}", other),
                    ));
                }
            };
            for val in data {
                file.write_all(&val.to_le_bytes())?;
            }
        }

        self.manifest.frames.push(FrameEntry {
            step: snap.step,
            time: snap.time,
            file: file_name,
        });
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.manifest.frames.len()
    }

    /// Write manifest.json and close out the run directory.
    pub fn finish(self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.manifest)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(self.dir.join("manifest.json"), json)
    }
}

pub struct CvfReader {
    dir: PathBuf,
    pub manifest: Manifest,
}

impl CvfReader {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let json = fs::read_to_string(dir.join("manifest.json"))?;
        let manifest: Manifest = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self { dir, manifest })
    }

    pub fn frame_count(&self) -> usize {
        self.manifest.frames.len()
    }

    pub fn read_frame(&self, index: usize) -> io::Result<CvfFrame> {
        if index >= self.manifest.frames.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame index {} out of range", index),
            ));
        }
        let entry = &self.manifest.frames[index];
        let path = self.dir.join(&entry.file);
        let mut file = fs::File::open(&path)?;
        read_cvf_frame(&mut file)
    }

    pub fn read_all_frames(&self) -> io::Result<Vec<CvfFrame>> {
        (0..self.frame_count()).map(|i| self.read_frame(i)).collect()
    }
}

fn read_cvf_frame<R: Read>(r: &mut R) -> io::Result<CvfFrame> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != CVF_MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid CVF magic: {:?}", magic),
        ));
    }

    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    let version = u32::from_le_bytes(buf4);
    if version != CVF_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported CVF version: {}", version),
        ));
    }

    r.read_exact(&mut buf4)?;
    let nx = u32::from_le_bytes(buf4) as usize;
    r.read_exact(&mut buf4)?;
    let ny = u32::from_le_bytes(buf4) as usize;
    let grid_size = nx * ny;

    r.read_exact(&mut buf4)?;
    let field_count = u32::from_le_bytes(buf4) as usize;

    let mut buf8 = [0u8; 8];
    r.read_exact(&mut buf8)?;
    let step = u64::from_le_bytes(buf8);
    r.read_exact(&mut buf8)?;
    let time = f64::from_le_bytes(buf8);

    let mut field_names = Vec::with_capacity(field_count);
    for _ in 0..field_count {
        let mut entry = [0u8; FIELD_NAME_ENTRY_SIZE];
        r.read_exact(&mut entry)?;
        let len = entry[0] as usize;
        let name = std::str::from_utf8(&entry[1..1 + len])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            .to_string();
        field_names.push(name);
    }

    let mut fields = Vec::with_capacity(field_count);
    for name in field_names {
        let mut data = vec![0.0f64; grid_size];
        for val in &mut data {
            r.read_exact(&mut buf8)?;
            *val = f64::from_le_bytes(buf8);
        }
        fields.push((name, data));
    }

    Ok(CvfFrame { step, time, fields })
}
