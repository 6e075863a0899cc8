use crate::cli::interactive_display::Browser;
use crate::cli::main_types::{Commands, ConfigCommands, ViewArgs};
use crate::core::filter::ItemFilter;
use crate::core::items::ItemSource;
use crate::core::pagination::PageRequest;
use crate::core::report_view::ReportView;
use crate::core::section::SectionView;
use crate::core::sort::SortOutcome;
use crate::display::{DisplayOptions, TableDisplay, is_fullscreen_capable};
use crate::error::{AppError, CliError, ExportError};
use crate::report::export::export_section;
use crate::report::model::Report;
use crate::storage::config::Config;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    display: DisplayOptions,
}

/// Apply sort, filter, page size and page from the command line, in that order.
fn apply_view_args<S: ItemSource>(
    section: &mut SectionView<S>,
    args: &ViewArgs,
    profile: Option<String>,
) -> Result<(), AppError> {
    if let Some(column) = args.sort {
        let outcome = section.on_sort_column(column)?;
        if args.desc && matches!(outcome, SortOutcome::Sorted(_)) {
            section.on_sort_column(column)?;
        }
    }
    if args.filter.is_some() || profile.is_some() {
        section.set_filter(ItemFilter::new(args.filter.clone(), profile));
    }
    if let Some(page_size) = args.page_size {
        section.on_change_page_size(page_size)?;
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err(CliError::InvalidArguments("--page must be at least 1".to_string()).into());
        }
        section.on_change_page(PageRequest::Page(page));
    }
    Ok(())
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, display: DisplayOptions) -> Self {
        Self {
            config,
            config_path,
            display,
        }
    }

    pub fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Show {
                report,
                tab,
                section,
                expand,
                view,
            } => self.handle_show(&report, tab.as_deref(), section.as_deref(), expand, &view),
            Commands::Nodes {
                report,
                profile,
                view,
            } => self.handle_nodes(&report, profile, &view),
            Commands::Browse { report } => self.handle_browse(&report),
            Commands::Export {
                report,
                section,
                output_dir,
                sort,
                desc,
            } => self.handle_export(&report, &section, &output_dir, sort, desc),
            Commands::Print {
                report,
                output,
                stdout,
            } => self.handle_print(&report, &output, stdout),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn table_display(&self) -> TableDisplay {
        self.display.table_display()
    }

    fn load_view(&self, path: &Path) -> Result<ReportView, AppError> {
        let report = Report::load(path)?;
        Ok(ReportView::new(report, &self.config.view_config()))
    }

    fn print_warnings(&self, view: &ReportView) {
        if !view.warnings().is_empty() {
            eprintln!("{}", self.table_display().render_warnings(view.warnings()));
        }
    }

    fn handle_show(
        &self,
        path: &Path,
        tab: Option<&str>,
        section_id: Option<&str>,
        expand: bool,
        args: &ViewArgs,
    ) -> Result<(), AppError> {
        let mut view = self.load_view(path)?;
        let display = self.table_display();

        if let Some(id) = section_id {
            let section = view.find_section_mut(id)?;
            section.open();
            apply_view_args(section, args, None)?;
            let page = section.render(false);
            println!("{}", display.render_section(section, &page, false)?);
            self.print_warnings(&view);
            return Ok(());
        }

        if let Some(id) = tab {
            view.switch_tab(id)?;
        }

        println!("{}", display.render_summary(&view));
        println!("{}", display.render_tab_bar(&view));
        let charts = display.render_charts(view.charts());
        if !charts.is_empty() {
            println!("{}", charts);
        }

        let Some(active) = view.active_tab_mut() else {
            println!("Report has no tabs");
            return Ok(());
        };
        for section in active.sections.iter_mut() {
            if expand {
                section.open();
            }
            if section.is_open() {
                apply_view_args(section, args, None)?;
            }
            let page = section.render(false);
            println!();
            println!("{}", display.render_section(section, &page, false)?);
        }
        self.print_warnings(&view);
        Ok(())
    }

    fn handle_nodes(
        &self,
        path: &Path,
        profile: Option<String>,
        args: &ViewArgs,
    ) -> Result<(), AppError> {
        let mut view = self.load_view(path)?;
        let display = self.table_display();
        let grid = view.node_grid_mut();
        apply_view_args(grid, args, profile)?;
        let page = grid.render(false);
        println!("{}", display.render_node_grid(grid, &page)?);
        self.print_warnings(&view);
        Ok(())
    }

    fn handle_browse(&self, path: &Path) -> Result<(), AppError> {
        if !is_fullscreen_capable() {
            return Err(CliError::NotATerminal.into());
        }
        let view = self.load_view(path)?;
        let mut browser = Browser::new(view, self.config.filter_debounce(), PathBuf::from("."));
        browser.run(&self.table_display())
    }

    fn handle_export(
        &self,
        path: &Path,
        section_id: &str,
        output_dir: &Path,
        sort: Option<usize>,
        desc: bool,
    ) -> Result<(), AppError> {
        let mut view = self.load_view(path)?;
        let cluster_name = view.cluster_name.clone();
        let section = view.find_section_mut(section_id)?;
        let args = ViewArgs {
            sort,
            desc,
            ..ViewArgs::default()
        };
        apply_view_args(section, &args, None)?;
        let written = export_section(section, &cluster_name, output_dir, Local::now())?;
        println!("✅ Exported {} rows to {}", section.source().len(), written.display());
        Ok(())
    }

    /// Text of every tab and section with all rows visible.
    pub fn render_print(&self, view: &mut ReportView) -> Result<String, AppError> {
        let display = self.table_display();
        let mut output = display.render_summary(view);
        let charts = display.render_charts(view.charts());
        if !charts.is_empty() {
            output.push_str("\n\n");
            output.push_str(&charts);
        }

        view.begin_print();
        let printing = view.is_printing();
        let mut result = Ok(());
        for tab in view.tabs_mut() {
            output.push_str(&format!("\n\n== {} ==", tab.title));
            for section in tab.sections.iter_mut() {
                let page = section.render(printing);
                match display.render_section(section, &page, printing) {
                    Ok(text) => {
                        output.push_str("\n\n");
                        output.push_str(&text);
                    }
                    Err(e) => {
                        result = Err(e);
                        break;
                    }
                }
            }
        }
        if result.is_ok() {
            let grid = view.node_grid_mut();
            if !grid.source().is_empty() {
                let page = grid.render(printing);
                match display.render_node_grid(grid, &page) {
                    Ok(text) => {
                        output.push_str("\n\n== Nodes ==\n");
                        output.push_str(&text);
                    }
                    Err(e) => result = Err(e),
                }
            }
        }
        view.end_print();
        result?;
        Ok(output)
    }

    fn handle_print(&self, path: &Path, output: &Path, stdout: bool) -> Result<(), AppError> {
        let mut view = self.load_view(path)?;
        let text = self.render_print(&mut view)?;
        if stdout {
            println!("{}", text);
        } else {
            fs::write(output, &text).map_err(|source| ExportError::FileIo {
                path: output.display().to_string(),
                source,
            })?;
            log::info!("Print export written to {}", output.display());
            println!("✅ Report written to {}", output.display());
        }
        self.print_warnings(&view);
        Ok(())
    }

    fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let path = match &self.config_path {
                    Some(path) => path.clone(),
                    None => Config::config_file_path()?,
                };
                println!("Config file: {}", path.display());
                for (key, value) in self.config.entries() {
                    println!("{} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.config.set(&key, &value)?;
                self.config.save(self.config_path.clone())?;
                println!("✅ Set {} = {}", key, self.config.get(&key)?);
                Ok(())
            }
        }
    }
}
