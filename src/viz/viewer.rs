//! # NEB 路径 3D 交互视图
//!
//! 将路径上的结构写成多模型 PDB，嵌入一个使用 NGL 渲染的独立 HTML 页面：
//! 球棍模型、原子编号标签、晶胞边框、正交投影，并用滑块切换 image。
//!
//! ## 依赖关系
//! - 被 `analyzer/mod.rs` 的 `vis_pathway` 调用
//! - 使用 `models/structure.rs`
//! - 使用 `serde_json` 生成嵌入脚本的数据

use crate::error::{NebError, Result};
use crate::models::Crystal;

use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

/// 3D 视图配置
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// 输出 HTML 路径
    pub output: PathBuf,
    pub title: String,
    /// NGL 脚本地址
    pub ngl_url: String,
    /// 视图高度 (px)
    pub height_px: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            output: PathBuf::from("pathway.html"),
            title: "NEB pathway".to_string(),
            ngl_url: "https://cdn.jsdelivr.net/npm/ngl@2.3.1/dist/ngl.js".to_string(),
            height_px: 600,
        }
    }
}

/// 每一帧的说明信息
#[derive(Debug, Serialize)]
struct FrameInfo<'a> {
    image: &'a str,
    formula: String,
    energy: Option<f64>,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="{{NGL_URL}}"></script>
<style>
  body { font-family: sans-serif; margin: 12px; }
  #viewport { width: 100%; height: {{HEIGHT}}px; border: 1px solid #ccc; }
  #controls { margin-top: 8px; }
</style>
</head>
<body>
<h3>{{TITLE}}</h3>
<div id="viewport"></div>
<div id="controls">
  <input id="frame" type="range" min="0" max="0" value="0" step="1">
  <span id="frame-label"></span>
</div>
<script>
var pdb = {{PDB}};
var frames = {{FRAMES}};
var stage = new NGL.Stage("viewport", { backgroundColor: "white", cameraType: "orthographic" });
var slider = document.getElementById("frame");
var label = document.getElementById("frame-label");

stage.loadFile(new Blob([pdb], { type: "text/plain" }), { ext: "pdb", asTrajectory: true })
  .then(function (comp) {
    comp.addRepresentation("ball+stick");
    comp.addRepresentation("label", { labelType: "atomindex", color: "blue" });
    comp.addRepresentation("unitcell");
    comp.autoView();

    var traj = comp.addTrajectory().trajectory;
    slider.max = frames.length - 1;

    function show(i) {
      traj.setFrame(i);
      var f = frames[i];
      var text = "Image " + f.image + " (" + f.formula + ")";
      if (f.energy !== null) { text += "  E = " + f.energy.toFixed(6) + " eV"; }
      label.textContent = text;
    }
    slider.addEventListener("input", function () { show(parseInt(slider.value, 10)); });
    show(0);
  });

window.addEventListener("resize", function () { stage.handleResize(); });
</script>
</body>
</html>
"#;

/// 将结构列表写成多模型 PDB（每个 image 一个 MODEL）
pub fn to_pdb_models(structures: &[Crystal]) -> String {
    let mut out = String::new();

    for (model, crystal) in structures.iter().enumerate() {
        let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
        let _ = writeln!(out, "MODEL     {:>4}", model + 1);
        let _ = writeln!(
            out,
            "CRYST1{:9.3}{:9.3}{:9.3}{:7.2}{:7.2}{:7.2} P 1           1",
            a, b, c, alpha, beta, gamma
        );

        for (serial, (atom, pos)) in crystal
            .atoms
            .iter()
            .zip(crystal.cartesian_positions())
            .enumerate()
        {
            let _ = writeln!(
                out,
                "ATOM  {:>5} {:<4} MOL A   1    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {:>2}",
                serial + 1,
                atom.element,
                pos[0],
                pos[1],
                pos[2],
                atom.element
            );
        }
        out.push_str("ENDMDL\n");
    }
    out.push_str("END\n");
    out
}

/// 生成 HTML 页面内容
pub fn render_viewer_html(structures: &[Crystal], config: &ViewerConfig) -> Result<String> {
    if structures.is_empty() {
        return Err(NebError::InvalidArgument(
            "no structures to visualize".to_string(),
        ));
    }

    let frames: Vec<FrameInfo> = structures
        .iter()
        .map(|c| FrameInfo {
            image: &c.name,
            formula: c.formula(),
            energy: c.energy,
        })
        .collect();

    let pdb = to_script_literal(&to_pdb_models(structures))?;
    let frames = to_script_literal(&frames)?;

    Ok(TEMPLATE
        .replace("{{TITLE}}", &escape_html(&config.title))
        .replace("{{NGL_URL}}", &escape_html(&config.ngl_url))
        .replace("{{HEIGHT}}", &config.height_px.to_string())
        .replace("{{PDB}}", &pdb)
        .replace("{{FRAMES}}", &frames))
}

/// 写出 HTML 文件
pub fn write_viewer(structures: &[Crystal], config: &ViewerConfig) -> Result<()> {
    let html = render_viewer_html(structures, config)?;
    fs::write(&config.output, html).map_err(|e| NebError::FileWriteError {
        path: config.output.display().to_string(),
        source: e,
    })
}

/// JSON 序列化后即为合法的 JS 字面量；再转义 `</` 防止提前结束 script 标签
fn to_script_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| NebError::InvalidArgument(format!("cannot embed viewer data: {}", e)))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn image(name: &str, z: f64) -> Crystal {
        let lattice = Lattice::from_vectors([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]);
        let mut crystal = Crystal::new(
            name,
            lattice,
            vec![Atom::new("H", [0.5, 0.5, z]), Atom::new("Pt", [0.0, 0.0, 0.0])],
        );
        crystal.energy = Some(-3.5);
        crystal
    }

    #[test]
    fn test_pdb_models() {
        let pdb = to_pdb_models(&[image("00", 0.5), image("01", 0.6)]);

        assert_eq!(pdb.matches("MODEL").count(), 2);
        assert_eq!(pdb.matches("ENDMDL").count(), 2);
        assert!(pdb.contains("CRYST1   10.000   10.000   10.000  90.00  90.00  90.00 P 1"));

        let atom_line = pdb.lines().find(|l| l.starts_with("ATOM")).unwrap();
        assert_eq!(&atom_line[30..38], "   5.000");
        assert_eq!(&atom_line[76..78], " H");
    }

    #[test]
    fn test_render_html() {
        let config = ViewerConfig {
            title: "TS <search>".to_string(),
            ..ViewerConfig::default()
        };
        let html = render_viewer_html(&[image("00", 0.5), image("01", 0.6)], &config).unwrap();

        assert!(html.contains("TS &lt;search&gt;"));
        assert!(html.contains("\"image\":\"01\""));
        assert!(html.contains("atomindex"));
        assert!(html.contains("orthographic"));
        assert!(html.contains("unitcell"));
        assert!(!html.contains("{{PDB}}"));
    }

    #[test]
    fn test_render_empty_pathway() {
        assert!(render_viewer_html(&[], &ViewerConfig::default()).is_err());
    }
}
