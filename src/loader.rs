use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use gridview::record::ID_FIELD;
use gridview::{Column, Format, Record, Value};

use crate::domain::AppError;

const COLUMN_WIDTH_MARGIN: usize = 2;

#[derive(Debug, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    file_type: FileType,
}

/// Which columns get special treatment when the schema is built.
#[derive(Debug, Default, Clone)]
pub struct SchemaHints {
    pub date_columns: Vec<String>,
    pub currency_columns: Vec<String>,
    pub color_columns: Vec<String>,
    pub unsortable: Vec<String>,
    pub max_column_width: usize,
}

// One loaded column, with every value already converted
struct LoadedColumn {
    name: String,
    max_width: usize,
    is_date: bool,
    data: Vec<Value>,
}

pub struct LoadedTable {
    pub name: String,
    pub records: Vec<Record>,
    pub columns: Vec<Column>,
}

pub fn load_data_file(path: PathBuf, hints: &SchemaHints) -> Result<LoadedTable, AppError> {
    let file_info = get_file_info(path)?;
    debug!("Loading {:?} ({} bytes)", file_info.path, file_info.file_size);
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    // Each column is converted in its own rayon task.
    let start_time = Instant::now();
    let df = Arc::new(frame.collect()?);
    let loaded: Result<Vec<LoadedColumn>, _> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect();
    let loaded = loaded?;

    let records = to_records(&loaded, df.height());
    let columns = to_schema(&loaded, hints);

    info!(
        "Loading {} records with {} columns took {}ms ...",
        records.len(),
        columns.len(),
        start_time.elapsed().as_millis()
    );

    let name = file_info
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();
    Ok(LoadedTable {
        name,
        records,
        columns,
    })
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<LoadedColumn, PolarsError> {
    let original_dtype = df.column(col_name)?.dtype().clone();
    let numeric = is_numeric_type(&original_dtype);
    let is_date = matches!(original_dtype, DataType::Date | DataType::Datetime(_, _));

    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let mut data = Vec::with_capacity(series.len());

    let mut max_width = 0;
    for value in series.into_iter() {
        let v = match value {
            Some(s) if numeric => s
                .parse::<f64>()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::Text(s.to_string())),
            Some(s) => Value::Text(s.replace("\r\n", " ↵ ").replace('\n', " ↵ ")),
            None => Value::Null,
        };
        max_width = max_width.max(v.as_text().chars().count());
        data.push(v);
    }

    Ok(LoadedColumn {
        name: col_name.to_string(),
        max_width,
        is_date,
        data,
    })
}

fn to_records(columns: &[LoadedColumn], height: usize) -> Vec<Record> {
    let has_id = columns.iter().any(|c| c.name == ID_FIELD);
    (0..height)
        .map(|ridx| {
            let mut record: Record = columns
                .iter()
                .map(|c| (c.name.clone(), c.data[ridx].clone()))
                .collect();
            if !has_id {
                record.insert(ID_FIELD, (ridx + 1) as i64);
            }
            record
        })
        .collect()
}

fn to_schema(columns: &[LoadedColumn], hints: &SchemaHints) -> Vec<Column> {
    let listed = |names: &[String], name: &str| names.iter().any(|n| n == name);
    columns
        .iter()
        .map(|c| {
            let format = if listed(&hints.color_columns, &c.name) {
                Format::Color
            } else if listed(&hints.date_columns, &c.name) || c.is_date {
                Format::Date
            } else if listed(&hints.currency_columns, &c.name) {
                Format::Currency
            } else {
                Format::None
            };
            Column::new(c.name.clone())
                .sortable(!listed(&hints.unsortable, &c.name))
                .format(format)
                .width(calculate_column_width(c, format, hints.max_column_width))
        })
        .collect()
}

fn calculate_column_width(column: &LoadedColumn, format: Format, max_column_width: usize) -> u16 {
    let content = match format {
        // Long form dates, e.g. "September 22nd 2024, 11:59 PM"
        Format::Date => 30,
        _ => column.max_width,
    };
    let width = std::cmp::max(column.name.chars().count() + 2, content) + COLUMN_WIDTH_MARGIN;
    std::cmp::min(width, max_column_width.max(COLUMN_WIDTH_MARGIN + 1)) as u16
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, AppError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::FileNotFound,
        ErrorKind::PermissionDenied => AppError::PermissionDenied,
        _ => AppError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(AppError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, AppError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(AppError::UnknownFileType),
    }
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}
