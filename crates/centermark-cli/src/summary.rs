use centermark_core::locate::{LocateReport, VolumeCenter};
use console::Style;
use nalgebra::Point3;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_locate_report(report: &LocateReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Center of Mass"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    print_volume_section(&s, &report.first);
    print_volume_section(&s, &report.second);

    println!("  {}", s.header.apply_to("Fiducial"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Label"),
        s.value.apply_to(&report.label)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Position"),
        s.value.apply_to(format_point(&report.midpoint))
    );
    println!();
}

pub fn print_volume_center(center: &VolumeCenter) {
    let s = Styles::new();

    println!();
    print_volume_section(&s, center);
}

fn print_volume_section(s: &Styles, center: &VolumeCenter) {
    println!("  {}", s.header.apply_to(&center.name));
    if center.centroid.is_fallback() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Structure"),
            s.disabled.apply_to("empty (origin fallback)")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Voxels"),
            s.value.apply_to(center.centroid.structure_voxels)
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Centroid"),
        s.value.apply_to(format_point(&center.centroid.ijk))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("World"),
        s.value.apply_to(format_point(&center.world))
    );
    println!();
}

fn format_point(p: &Point3<f64>) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}
